//! Collection descriptors for introspection and diagnostics.

use crate::key::CollectionKey;
use crate::lifetime::Lifetime;
use crate::types::TypeDescriptor;

/// Snapshot of one registered collection.
///
/// Contains what was registered, not what any request resolves to: open
/// items are listed in their open form.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{ServiceCollection, Lifetime, TypeDefinition, TypeDescriptor, GenericParameter};
///
/// let ihandler = TypeDefinition::interface("IHandler").generic(GenericParameter::new("T")).build();
/// let handler = TypeDefinition::class("Handler")
///     .generic(GenericParameter::new("T"))
///     .implements(ihandler.make_generic([TypeDescriptor::parameter("T")]))
///     .build();
///
/// let mut services = ServiceCollection::new();
/// services.add_collection(ihandler.open(), [handler.open()], Lifetime::Scoped).unwrap();
///
/// let descriptors = services.get_collection_descriptors();
/// assert_eq!(descriptors.len(), 1);
/// assert!(descriptors[0].controlled);
/// assert_eq!(descriptors[0].items[0].implementation_type.to_string(), "Handler<T>");
/// assert_eq!(descriptors[0].items[0].lifetime, Lifetime::Scoped);
/// ```
#[derive(Debug, Clone)]
pub struct CollectionDescriptor {
    pub key: CollectionKey,
    /// Open form of the service type definition
    pub service_type: TypeDescriptor,
    pub controlled: bool,
    pub items: Vec<CollectionItemDescriptor>,
}

/// One registered item of a [`CollectionDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItemDescriptor {
    /// The service type the item was registered against
    pub service_type: TypeDescriptor,
    pub implementation_type: TypeDescriptor,
    pub lifetime: Lifetime,
    /// True when the item was registered as a finished registration
    pub prebuilt: bool,
}

impl CollectionDescriptor {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// True when some item still needs closing per request.
    pub fn has_open_items(&self) -> bool {
        self.items
            .iter()
            .any(|i| i.implementation_type.contains_generic_parameters())
    }
}
