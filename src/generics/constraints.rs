//! Declared generic constraint checks.

use crate::types::{GenericConstraint, Substitution, TypeDescriptor};
use super::ClosingFailure;

/// Checks every constraint of every parameter of `implementation` under `substitution`.
///
/// Arguments the implementation already fixes (as in `Pair<T, Order>`) are
/// checked as well.
pub(super) fn check(implementation: &TypeDescriptor, substitution: &Substitution) -> Result<(), ClosingFailure> {
    let Some(definition) = implementation.definition() else {
        return Ok(());
    };
    let declared = implementation.definition_substitution();

    for (parameter, pattern) in definition.parameters().iter().zip(implementation.arguments()) {
        let argument = pattern.substitute(substitution);
        if argument.contains_generic_parameters() {
            return Err(ClosingFailure::UnboundParameter {
                parameter: parameter.name_arc().clone(),
            });
        }

        for constraint in parameter.constraints() {
            let constraint = resolve_bound(constraint, &declared, substitution);
            if !satisfies(&argument, &constraint) {
                return Err(ClosingFailure::ConstraintViolation {
                    parameter: parameter.name_arc().clone(),
                    argument,
                    constraint,
                });
            }
        }
    }

    Ok(())
}

fn resolve_bound(
    constraint: &GenericConstraint,
    declared: &Substitution,
    substitution: &Substitution,
) -> GenericConstraint {
    match constraint {
        GenericConstraint::BaseType(bound) => {
            GenericConstraint::BaseType(bound.substitute(declared).substitute(substitution))
        }
        GenericConstraint::Interface(bound) => {
            GenericConstraint::Interface(bound.substitute(declared).substitute(substitution))
        }
        other => other.clone(),
    }
}

/// True when `argument` satisfies a constraint whose bound is already resolved.
pub(crate) fn satisfies(argument: &TypeDescriptor, constraint: &GenericConstraint) -> bool {
    match constraint {
        GenericConstraint::ReferenceType => argument.is_reference_type(),
        GenericConstraint::ValueType => argument.is_value_type(),
        GenericConstraint::DefaultConstructor => argument.has_default_constructor(),
        GenericConstraint::BaseType(bound) | GenericConstraint::Interface(bound) => {
            // a bound that still mentions parameters cannot be verified
            !bound.contains_generic_parameters() && argument.is_assignable_to(bound)
        }
    }
}
