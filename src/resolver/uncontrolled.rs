//! Resolver for collections whose registrations the caller built.

use crate::collection::ControlledItem;
use crate::error::{DiError, DiResult};
use crate::registration::Registration;
use crate::types::TypeDescriptor;

/// Pre-built registrations, each set bound to exactly one closed service type.
///
/// The container does not own these items: they are returned unchanged,
/// only for the service type they were registered against, and never
/// closed or deduplicated.
#[derive(Debug, Clone)]
pub struct UncontrolledCollectionResolver {
    service_type: TypeDescriptor,
    collections: Vec<(TypeDescriptor, Vec<Registration>)>,
}

impl UncontrolledCollectionResolver {
    /// `service_type` is the open form of the service definition.
    pub(crate) fn new(service_type: TypeDescriptor) -> Self {
        Self {
            service_type,
            collections: Vec::new(),
        }
    }

    pub fn service_type(&self) -> &TypeDescriptor {
        &self.service_type
    }

    pub(crate) fn register(
        &mut self,
        service_type: TypeDescriptor,
        registrations: Vec<Registration>,
        allow_overriding: bool,
    ) -> DiResult<()> {
        if let Some((_, existing)) = self.collections.iter_mut().find(|(s, _)| s == &service_type) {
            if !allow_overriding {
                return Err(DiError::CollectionAlreadyRegistered {
                    service_type: service_type.to_string(),
                });
            }
            tracing::debug!(service = %service_type, items = registrations.len(), "replacing uncontrolled collection");
            *existing = registrations;
            return Ok(());
        }

        tracing::debug!(service = %service_type, items = registrations.len(), "registering uncontrolled collection");
        self.collections.push((service_type, registrations));
        Ok(())
    }

    /// Registered service types in registration order.
    pub fn service_types(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.collections.iter().map(|(s, _)| s)
    }

    pub fn registrations_for(&self, service_type: &TypeDescriptor) -> &[Registration] {
        self.collections
            .iter()
            .find(|(s, _)| s == service_type)
            .map_or(&[], |(_, r)| r.as_slice())
    }

    pub fn resolve(&self, requested: &TypeDescriptor) -> Vec<ControlledItem> {
        self.registrations_for(requested)
            .iter()
            .cloned()
            .map(ControlledItem::from_registration)
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.collections.iter().map(|(_, r)| r.len()).sum()
    }
}
