//! Keys identifying collection resolvers.

use std::fmt;
use std::sync::Arc;

use crate::types::TypeDescriptor;

/// Key of the resolver that owns every collection registration for one
/// service type definition.
///
/// `IRepo<T>`, `IRepo<Order>` and `IRepo<Customer>` all share the key of
/// the `IRepo` definition, so registrations against the open and closed
/// forms end up in the same resolver.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{CollectionKey, TypeDefinition, GenericParameter};
///
/// let irepo = TypeDefinition::interface("IRepo").generic(GenericParameter::new("T")).build();
/// let order = TypeDefinition::class("Order").build();
///
/// let open = CollectionKey::of(&irepo.open()).unwrap();
/// let closed = CollectionKey::of(&irepo.make_generic([order.descriptor()])).unwrap();
/// assert_eq!(open, closed);
/// assert_eq!(open.display_name(), "IRepo");
/// assert_eq!(open.arity(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionKey {
    definition: Arc<str>,
    arity: usize,
}

impl CollectionKey {
    /// The key for `service_type`, or `None` for a bare generic parameter.
    ///
    /// Keys compare like [`TypeDefinition::is_same_definition`](crate::TypeDefinition::is_same_definition).
    pub fn of(service_type: &TypeDescriptor) -> Option<Self> {
        let definition = service_type.definition()?;
        Some(Self {
            definition: definition.name_arc().clone(),
            arity: definition.arity(),
        })
    }

    /// Name of the service type definition.
    pub fn display_name(&self) -> &str {
        &self.definition
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arity == 0 {
            f.write_str(&self.definition)
        } else {
            write!(f, "{}<{}>", self.definition, ",".repeat(self.arity - 1))
        }
    }
}
