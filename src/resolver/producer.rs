//! Collection producers handed to the rest of the container.

use std::ops::Index;
use std::slice;

use crate::collection::ControlledItem;
use crate::registration::{Registration, RegistrationBuilder};
use crate::types::{enumerable_of, TypeDescriptor};

/// The resolved collection for one closed service type.
///
/// `items` keeps what the resolver produced; `collection` holds one
/// [`Registration`] per item, reusing built registrations and building the
/// rest through the container's [`RegistrationBuilder`].
#[derive(Debug, Clone)]
pub struct CollectionProducer {
    service_type: TypeDescriptor,
    collection_type: TypeDescriptor,
    items: Vec<ControlledItem>,
    collection: ControlledCollection,
}

impl CollectionProducer {
    pub(crate) fn new(service_type: TypeDescriptor, items: Vec<ControlledItem>, builder: &dyn RegistrationBuilder) -> Self {
        let registrations = items
            .iter()
            .map(|item| match item {
                ControlledItem::BuiltRegistration(registration) => registration.clone(),
                ControlledItem::ImplementationType { implementation, lifetime } => {
                    builder.build(implementation, *lifetime)
                }
            })
            .collect();

        Self {
            collection_type: enumerable_of(&service_type),
            collection: ControlledCollection {
                element_type: service_type.clone(),
                registrations,
            },
            service_type,
            items,
        }
    }

    /// The closed element type.
    pub fn service_type(&self) -> &TypeDescriptor {
        &self.service_type
    }

    /// `IEnumerable<service_type>`.
    pub fn collection_type(&self) -> &TypeDescriptor {
        &self.collection_type
    }

    pub fn items(&self) -> &[ControlledItem] {
        &self.items
    }

    pub fn collection(&self) -> &ControlledCollection {
        &self.collection
    }
}

/// Ordered registrations making up a resolved collection.
#[derive(Debug, Clone)]
pub struct ControlledCollection {
    element_type: TypeDescriptor,
    registrations: Vec<Registration>,
}

impl ControlledCollection {
    pub fn element_type(&self) -> &TypeDescriptor {
        &self.element_type
    }

    pub fn iter(&self) -> slice::Iter<'_, Registration> {
        self.registrations.iter()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Registration> {
        self.registrations.get(index)
    }
}

impl Index<usize> for ControlledCollection {
    type Output = Registration;

    fn index(&self, index: usize) -> &Registration {
        &self.registrations[index]
    }
}

impl<'a> IntoIterator for &'a ControlledCollection {
    type Item = &'a Registration;
    type IntoIter = slice::Iter<'a, Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
