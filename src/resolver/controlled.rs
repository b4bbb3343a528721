//! Resolver for container-controlled collections.

use std::collections::HashSet;

use crate::collection::{ControlledItem, RegistrationGroup};
use crate::error::{DiError, DiResult};
use crate::generics::{close, ClosingFailure};
use crate::types::TypeDescriptor;
use super::ResolveContext;

/// All container-controlled registrations for one service type definition.
///
/// Groups are kept in declaration order; resolution walks them in that
/// order and then walks each group's items in order, so resolving the same
/// request against the same registrations always yields the same sequence.
#[derive(Debug, Clone)]
pub struct ControlledCollectionResolver {
    service_type: TypeDescriptor,
    groups: Vec<RegistrationGroup>,
}

impl ControlledCollectionResolver {
    /// `service_type` is the open form of the service definition.
    pub(crate) fn new(service_type: TypeDescriptor) -> Self {
        Self {
            service_type,
            groups: Vec::new(),
        }
    }

    pub fn service_type(&self) -> &TypeDescriptor {
        &self.service_type
    }

    pub fn groups(&self) -> &[RegistrationGroup] {
        &self.groups
    }

    /// Adds a group, or replaces the items of the existing non-appended
    /// group for the same service type when `append` is false.
    ///
    /// Items must already have passed [`ensure_applicable`].
    pub(crate) fn add_controlled_registrations(
        &mut self,
        service_type: TypeDescriptor,
        items: Vec<ControlledItem>,
        append: bool,
        allow_overriding: bool,
    ) -> DiResult<()> {
        if !append {
            if let Some(existing) = self
                .groups
                .iter_mut()
                .find(|g| !g.is_appended() && g.service_type() == &service_type)
            {
                if !allow_overriding {
                    return Err(DiError::CollectionAlreadyRegistered {
                        service_type: service_type.to_string(),
                    });
                }
                tracing::debug!(service = %service_type, items = items.len(), "replacing collection registration");
                existing.replace_items(items);
                return Ok(());
            }
        }

        tracing::debug!(service = %service_type, items = items.len(), append, "registering collection group");
        self.groups
            .push(RegistrationGroup::for_controlled_items(service_type, items, append));
        Ok(())
    }

    /// Items that make up the collection for `requested`, in registration order.
    ///
    /// Open items are closed for the request; items that cannot be closed
    /// are left out without error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_generics::{ServiceCollection, ControlledItem, Lifetime, TypeDefinition, TypeDescriptor, GenericParameter};
    ///
    /// let ivalidator = TypeDefinition::interface("IValidator").generic(GenericParameter::new("T")).build();
    /// let null_validator = TypeDefinition::class("NullValidator")
    ///     .generic(GenericParameter::new("T"))
    ///     .implements(ivalidator.make_generic([TypeDescriptor::parameter("T")]))
    ///     .build();
    /// let order = TypeDefinition::class("Order").build();
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .add_collection(ivalidator.open(), [null_validator.open()], Lifetime::Transient)
    ///     .unwrap();
    /// let provider = services.build();
    ///
    /// let items = provider.resolve_collection(&ivalidator.make_generic([order.descriptor()])).unwrap();
    /// assert_eq!(items.len(), 1);
    /// assert_eq!(items[0].implementation_type().to_string(), "NullValidator<Order>");
    /// ```
    pub fn resolve(&self, requested: &TypeDescriptor) -> Vec<ControlledItem> {
        self.resolve_with(requested, &ResolveContext::detached())
    }

    pub(crate) fn resolve_with(&self, requested: &TypeDescriptor, ctx: &ResolveContext<'_>) -> Vec<ControlledItem> {
        let items = self
            .groups
            .iter()
            .filter(|g| g.is_applicable_to(requested))
            .flat_map(|g| g.items());

        let resolved: Vec<ControlledItem> = if requested.is_generic() {
            items.filter_map(|item| close_item(item, requested, ctx)).collect()
        } else {
            items.cloned().collect()
        };

        dedupe(resolved)
    }

    /// Closed service types that closed implementations are known to satisfy.
    ///
    /// Only items whose implementation type is closed contribute; an open
    /// item's closed shape is unknown until a request arrives.
    pub fn known_closed_service_types(&self) -> Vec<TypeDescriptor> {
        let mut seen = HashSet::new();
        let mut known = Vec::new();

        for item in self.groups.iter().flat_map(|g| g.items()) {
            let implementation = item.implementation_type();
            if implementation.contains_generic_parameters() {
                continue;
            }
            for service in implementation.supertypes_for(&self.service_type) {
                if seen.insert(service.clone()) {
                    known.push(service);
                }
            }
        }

        known
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items().len()).sum()
    }
}

fn close_item(item: &ControlledItem, requested: &TypeDescriptor, ctx: &ResolveContext<'_>) -> Option<ControlledItem> {
    let implementation = item.implementation_type();
    let result = ctx.close(implementation, requested);

    match (result.closed_implementation, item) {
        (Some(closed), ControlledItem::ImplementationType { lifetime, .. }) => {
            tracing::trace!(service = %requested, open = %implementation, %closed, "closed collection item");
            ctx.observers.item_closed(requested, implementation, &closed);
            Some(ControlledItem::from_type(closed, *lifetime))
        }
        (Some(_), ControlledItem::BuiltRegistration(_)) => Some(item.clone()),
        (None, _) => {
            let failure = result.failure.unwrap_or_else(|| ClosingFailure::NoMatchingServiceType {
                implementation: implementation.clone(),
                service: requested.clone(),
            });
            tracing::trace!(service = %requested, %implementation, %failure, "discarded collection item");
            ctx.observers.item_discarded(requested, implementation, &failure);
            None
        }
    }
}

/// Drops later copies of an item, keeping first-seen order.
fn dedupe(items: Vec<ControlledItem>) -> Vec<ControlledItem> {
    let mut unique: Vec<ControlledItem> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// Rejects items whose implementation can never serve `service_type`.
pub(super) fn ensure_applicable(service_type: &TypeDescriptor, item: &ControlledItem) -> DiResult<()> {
    let implementation = item.implementation_type();

    let applicable = if service_type.contains_generic_parameters() {
        !implementation.supertypes_for(service_type).is_empty()
    } else if implementation.contains_generic_parameters() {
        close(implementation, service_type).success
    } else {
        implementation.is_assignable_to(service_type)
    };

    if applicable {
        Ok(())
    } else {
        tracing::warn!(service = %service_type, %implementation, "rejected collection item");
        Err(DiError::ImplementationNotAssignable {
            service_type: service_type.to_string(),
            implementation: implementation.to_string(),
        })
    }
}
