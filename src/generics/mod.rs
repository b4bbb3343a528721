//! Closing open-generic implementations against requested service types.
//!
//! [`close`] takes an implementation descriptor that may contain unbound
//! generic parameters (`Repo<T>`) and a closed service type
//! (`IRepo<Order>`), infers the parameter bindings by structural matching,
//! checks every declared constraint, and produces the closed implementation
//! (`Repo<Order>`). It is a pure function of its inputs.

mod cache;
mod constraints;
mod unifier;

use std::fmt;
use std::sync::Arc;

use crate::types::{GenericConstraint, TypeDescriptor};

pub use cache::{ClosingCache, ClosingCacheStats};

/// Why an implementation could not be closed for a request.
///
/// None of these are errors: an open-generic implementation may apply to
/// some closed requests and not to others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosingFailure {
    /// The request still contains generic parameters
    RequestedServiceNotClosed {
        service: TypeDescriptor,
    },
    /// The implementation has no supertype whose shape matches the request
    NoMatchingServiceType {
        implementation: TypeDescriptor,
        service: TypeDescriptor,
    },
    /// A parameter could not be inferred from the request
    UnboundParameter {
        parameter: Arc<str>,
    },
    /// An inferred argument violates a declared constraint
    ConstraintViolation {
        parameter: Arc<str>,
        argument: TypeDescriptor,
        constraint: GenericConstraint,
    },
}

impl fmt::Display for ClosingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosingFailure::RequestedServiceNotClosed { service } => {
                write!(f, "{} is not a closed type", service)
            }
            ClosingFailure::NoMatchingServiceType { implementation, service } => {
                write!(f, "{} has no base type or interface matching {}", implementation, service)
            }
            ClosingFailure::UnboundParameter { parameter } => {
                write!(f, "generic parameter {} cannot be inferred", parameter)
            }
            ClosingFailure::ConstraintViolation { parameter, argument, constraint } => {
                write!(f, "{} does not satisfy constraint {}: {}", argument, parameter, constraint)
            }
        }
    }
}

/// Outcome of closing one implementation against one request.
///
/// `satisfies_constraints` reports whether the request satisfies every
/// constraint the implementation places on it, structural and declared;
/// a closed implementation is only present when it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingResult {
    pub success: bool,
    pub closed_implementation: Option<TypeDescriptor>,
    pub satisfies_constraints: bool,
    pub failure: Option<ClosingFailure>,
}

impl ClosingResult {
    fn closed(implementation: TypeDescriptor) -> Self {
        Self {
            success: true,
            closed_implementation: Some(implementation),
            satisfies_constraints: true,
            failure: None,
        }
    }

    fn failed(failure: ClosingFailure) -> Self {
        Self {
            success: false,
            closed_implementation: None,
            satisfies_constraints: false,
            failure: Some(failure),
        }
    }

    /// True when the failure was a violated declared constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self.failure, Some(ClosingFailure::ConstraintViolation { .. }))
    }
}

/// Closes `open_implementation` for `requested_service`.
///
/// Every supertype of the implementation that applies the requested
/// service's definition is a candidate, tried in supertype order. The first
/// candidate that binds all parameters and satisfies all constraints wins;
/// otherwise the failure of the first candidate is reported.
///
/// Already-closed implementations go through the same path and succeed
/// exactly when they are assignable to the request.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{close, TypeDefinition, TypeDescriptor, GenericParameter};
///
/// let irepo = TypeDefinition::interface("IRepo").generic(GenericParameter::new("T")).build();
/// let repo = TypeDefinition::class("Repo")
///     .generic(GenericParameter::new("T").reference_type())
///     .implements(irepo.make_generic([TypeDescriptor::parameter("T")]))
///     .build();
/// let order = TypeDefinition::class("Order").build();
/// let int = TypeDefinition::structure("Int32").build();
///
/// let result = close(&repo.open(), &irepo.make_generic([order.descriptor()]));
/// assert_eq!(result.closed_implementation.unwrap().to_string(), "Repo<Order>");
///
/// let result = close(&repo.open(), &irepo.make_generic([int.descriptor()]));
/// assert!(!result.success);
/// assert!(result.is_constraint_violation());
/// ```
pub fn close(open_implementation: &TypeDescriptor, requested_service: &TypeDescriptor) -> ClosingResult {
    if requested_service.contains_generic_parameters() {
        return ClosingResult::failed(ClosingFailure::RequestedServiceNotClosed {
            service: requested_service.clone(),
        });
    }

    let mut first_failure = None;
    for candidate in open_implementation.supertypes_for(requested_service) {
        match unifier::close_against(open_implementation, &candidate, requested_service) {
            Ok(closed) => return ClosingResult::closed(closed),
            Err(failure) => {
                first_failure.get_or_insert(failure);
            }
        }
    }

    ClosingResult::failed(first_failure.unwrap_or_else(|| ClosingFailure::NoMatchingServiceType {
        implementation: open_implementation.clone(),
        service: requested_service.clone(),
    }))
}
