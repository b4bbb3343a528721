//! Registration groups: the buckets collection items are registered into.

use crate::types::TypeDescriptor;
use super::item::ControlledItem;

/// Ordered items registered against one declared service type.
///
/// Groups are created by the first registration against a service type and
/// extended or replaced by later ones depending on the append flag. They are
/// frozen once the collection is built into a provider.
#[derive(Debug, Clone)]
pub struct RegistrationGroup {
    service_type: TypeDescriptor,
    items: Vec<ControlledItem>,
    appended: bool,
}

impl RegistrationGroup {
    pub(crate) fn for_controlled_items(service_type: TypeDescriptor, items: Vec<ControlledItem>, append: bool) -> Self {
        Self {
            service_type,
            items,
            appended: append,
        }
    }

    /// The declared service type; may be open.
    pub fn service_type(&self) -> &TypeDescriptor {
        &self.service_type
    }

    pub fn items(&self) -> &[ControlledItem] {
        &self.items
    }

    /// True when this group was added by an appending registration.
    pub fn is_appended(&self) -> bool {
        self.appended
    }

    pub(crate) fn replace_items(&mut self, items: Vec<ControlledItem>) {
        self.items = items;
    }

    /// Open groups are closing candidates for any request; closed groups
    /// apply when their service type is assignable to the request.
    pub fn is_applicable_to(&self, requested: &TypeDescriptor) -> bool {
        self.service_type.contains_generic_parameters() || self.service_type.is_assignable_to(requested)
    }
}
