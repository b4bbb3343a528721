//! Declarative type model.
//!
//! Every type the container knows about is described up front by a
//! [`TypeDefinition`]: its generic parameters with their constraint kinds,
//! its base type, the interfaces it implements and its constructors.
//! [`TypeDescriptor`]s apply definitions to type arguments and are what the
//! unifier, the collection resolver and the constructor selector work on.

mod definition;
mod descriptor;

use std::sync::Arc;

pub use definition::{
    Constructor, GenericConstraint, GenericParameter, Parameter, TypeDefinition,
    TypeDefinitionBuilder, TypeKind, Visibility,
};
pub use descriptor::{Substitution, TypeDescriptor};

/// Name of the enumerable definition collection producers are typed as.
pub const ENUMERABLE_TYPE_NAME: &str = "IEnumerable";

/// The well-known `IEnumerable<T>` interface definition.
pub fn enumerable_definition() -> Arc<TypeDefinition> {
    TypeDefinition::interface(ENUMERABLE_TYPE_NAME)
        .generic(GenericParameter::new("T"))
        .build()
}

/// `IEnumerable<element>`.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{TypeDefinition, types::enumerable_of};
///
/// let order = TypeDefinition::class("Order").build();
/// assert_eq!(enumerable_of(&order.descriptor()).to_string(), "IEnumerable<Order>");
/// ```
pub fn enumerable_of(element: &TypeDescriptor) -> TypeDescriptor {
    enumerable_definition().make_generic([element.clone()])
}
