//! Constructor selection.
//!
//! Picks the public constructor the container will invoke for a closed
//! implementation type. Resolvability of each parameter is decided by the
//! caller through an injected predicate, so selection itself is free of
//! side effects and does not depend on registration state.

use crate::error::{DiError, DiResult};
use crate::phase::ContainerPhase;
use crate::types::{Parameter, TypeDescriptor};

/// A public constructor considered for selection.
///
/// `index` is the position among the type's public constructors in
/// declaration order. Parameter types are already substituted for the
/// closed implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorCandidate {
    index: usize,
    parameters: Vec<Parameter>,
}

impl ConstructorCandidate {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.parameters.iter().map(Parameter::parameter_type)
    }
}

/// Strategy for choosing the constructor of an implementation.
///
/// `can_resolve` answers whether the container can supply a parameter. It
/// is only consulted where the behavior decides it matters for the given
/// `phase`.
pub trait ConstructorResolutionBehavior: Send + Sync {
    fn select_constructor(
        &self,
        implementation: &TypeDescriptor,
        phase: ContainerPhase,
        can_resolve: &dyn Fn(&Parameter) -> bool,
    ) -> DiResult<ConstructorCandidate>;
}

/// Selects the public constructor with the most parameters the container
/// can resolve.
///
/// While registering the dependency graph may be incomplete, so every
/// public constructor is a candidate. Once locked, a type with a single
/// public constructor always gets that constructor, whether or not its
/// parameters resolve; otherwise only constructors whose parameters all
/// resolve are candidates. The greatest arity wins and ties go to the
/// constructor declared first.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{ContainerPhase, Constructor, Parameter, TypeDefinition};
/// use ferrous_generics::constructor::{ConstructorResolutionBehavior, MostResolvableParametersBehavior};
///
/// let logger = TypeDefinition::interface("ILogger").build();
/// let clock = TypeDefinition::interface("IClock").build();
/// let handler = TypeDefinition::class("OrderHandler")
///     .constructor(Constructor::public([Parameter::new("logger", logger.descriptor())]))
///     .constructor(Constructor::public([
///         Parameter::new("logger", logger.descriptor()),
///         Parameter::new("clock", clock.descriptor()),
///     ]))
///     .build();
///
/// let behavior = MostResolvableParametersBehavior;
/// let only_logger = |p: &Parameter| p.parameter_type() == &logger.descriptor();
///
/// let chosen = behavior
///     .select_constructor(&handler.descriptor(), ContainerPhase::Locked, &only_logger)
///     .unwrap();
/// assert_eq!(chosen.index(), 0);
///
/// let chosen = behavior
///     .select_constructor(&handler.descriptor(), ContainerPhase::Registering, &only_logger)
///     .unwrap();
/// assert_eq!(chosen.index(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MostResolvableParametersBehavior;

impl ConstructorResolutionBehavior for MostResolvableParametersBehavior {
    fn select_constructor(
        &self,
        implementation: &TypeDescriptor,
        phase: ContainerPhase,
        can_resolve: &dyn Fn(&Parameter) -> bool,
    ) -> DiResult<ConstructorCandidate> {
        let candidates = public_candidates(implementation)?;
        let filter = phase.is_locked() && candidates.len() > 1;

        let mut best: Option<ConstructorCandidate> = None;
        for candidate in candidates {
            if filter && !candidate.parameters.iter().all(|p| can_resolve(p)) {
                continue;
            }
            // strictly greater keeps the first declared on ties
            if best.as_ref().map_or(true, |b| candidate.arity() > b.arity()) {
                best = Some(candidate);
            }
        }

        best.ok_or_else(|| DiError::NoConstructorWithResolvableParameters {
            implementation: implementation.to_string(),
        })
    }
}

/// Requires exactly one public constructor and always selects it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleConstructorBehavior;

impl ConstructorResolutionBehavior for SingleConstructorBehavior {
    fn select_constructor(
        &self,
        implementation: &TypeDescriptor,
        _phase: ContainerPhase,
        _can_resolve: &dyn Fn(&Parameter) -> bool,
    ) -> DiResult<ConstructorCandidate> {
        let mut candidates = public_candidates(implementation)?;
        if candidates.len() > 1 {
            return Err(DiError::MultiplePublicConstructors {
                implementation: implementation.to_string(),
                count: candidates.len(),
            });
        }
        Ok(candidates.remove(0))
    }
}

/// Public constructors of a closed implementation, never empty.
fn public_candidates(implementation: &TypeDescriptor) -> DiResult<Vec<ConstructorCandidate>> {
    if implementation.contains_generic_parameters() {
        return Err(DiError::OpenGenericImplementation {
            implementation: implementation.to_string(),
        });
    }

    let candidates: Vec<ConstructorCandidate> = implementation
        .public_constructors()
        .into_iter()
        .enumerate()
        .map(|(index, constructor)| ConstructorCandidate {
            index,
            parameters: constructor.parameters().to_vec(),
        })
        .collect();

    if candidates.is_empty() {
        return Err(DiError::NoPublicConstructor {
            implementation: implementation.to_string(),
        });
    }

    Ok(candidates)
}
