//! Structural unification of implementation shapes against closed requests.

use crate::types::{Substitution, TypeDescriptor};
use super::constraints;
use super::ClosingFailure;

/// Closes `implementation` through one candidate supertype.
pub(super) fn close_against(
    implementation: &TypeDescriptor,
    candidate: &TypeDescriptor,
    requested: &TypeDescriptor,
) -> Result<TypeDescriptor, ClosingFailure> {
    let mut substitution = Substitution::new();
    if !unify(candidate, requested, &mut substitution) {
        return Err(ClosingFailure::NoMatchingServiceType {
            implementation: implementation.clone(),
            service: requested.clone(),
        });
    }

    infer_from_constraints(implementation, &mut substitution);

    if let Some(parameter) = implementation
        .generic_parameters()
        .into_iter()
        .find(|p| !substitution.contains(p))
    {
        return Err(ClosingFailure::UnboundParameter { parameter });
    }

    constraints::check(implementation, &substitution)?;

    Ok(implementation.substitute(&substitution))
}

/// Matches `pattern` against the closed `concrete` type position by position.
///
/// Parameters in `pattern` are bound on first sight; a parameter seen again
/// must match its existing binding. On failure `substitution` may hold
/// partial bindings and should be discarded.
pub(super) fn unify(pattern: &TypeDescriptor, concrete: &TypeDescriptor, substitution: &mut Substitution) -> bool {
    match pattern {
        TypeDescriptor::Parameter(name) => match substitution.get(name) {
            Some(bound) => bound == concrete,
            None => {
                substitution.bind(name.clone(), concrete.clone());
                true
            }
        },
        TypeDescriptor::Named { arguments, .. } => {
            pattern.has_same_definition(concrete)
                && arguments
                    .iter()
                    .zip(concrete.arguments())
                    .all(|(p, c)| unify(p, c, substitution))
        }
    }
}

/// Solves parameters that only appear in constraint bounds.
///
/// For `Impl<T, TItem> where T: IEnumerable<TItem>`, once `T` is bound to
/// `List<Order>` the bound `IEnumerable<TItem>` is matched against the
/// supertypes of `List<Order>`, binding `TItem` to `Order`. Repeats until no
/// new binding is found.
fn infer_from_constraints(implementation: &TypeDescriptor, substitution: &mut Substitution) {
    let Some(definition) = implementation.definition() else {
        return;
    };
    let declared = implementation.definition_substitution();

    loop {
        let mut progressed = false;

        for (parameter, pattern) in definition.parameters().iter().zip(implementation.arguments()) {
            let argument = pattern.substitute(substitution);
            if argument.contains_generic_parameters() {
                continue;
            }

            for bound in parameter.constraints().iter().filter_map(|c| c.bound()) {
                let bound = bound.substitute(&declared).substitute(substitution);
                if !bound.contains_generic_parameters() {
                    continue;
                }

                for supertype in argument.supertypes_for(&bound) {
                    let mut attempt = substitution.clone();
                    if unify(&bound, &supertype, &mut attempt) {
                        if attempt.len() > substitution.len() {
                            *substitution = attempt;
                            progressed = true;
                        }
                        break;
                    }
                }
            }
        }

        if !progressed {
            break;
        }
    }
}
