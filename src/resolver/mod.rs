//! Collection resolution.
//!
//! Every service type definition that has collection registrations gets
//! exactly one resolver. A resolver is either container-controlled (items
//! are implementation types, possibly open-generic, that the container
//! closes and builds per request) or uncontrolled (the caller supplied
//! finished registrations for one closed service type). The two kinds never
//! mix for the same definition.

mod controlled;
mod producer;
mod uncontrolled;

use crate::collection::ControlledItem;
use crate::descriptors::{CollectionDescriptor, CollectionItemDescriptor};
use crate::error::{DiError, DiResult};
use crate::generics::{close, ClosingCache, ClosingResult};
use crate::internal::FastMap;
use crate::key::CollectionKey;
use crate::observer::{Observers, NO_OBSERVERS};
use crate::registration::Registration;
use crate::types::TypeDescriptor;

pub use controlled::ControlledCollectionResolver;
pub use producer::{CollectionProducer, ControlledCollection};
pub use uncontrolled::UncontrolledCollectionResolver;

/// Collaborators available while resolving.
pub(crate) struct ResolveContext<'a> {
    pub(crate) observers: &'a Observers,
    pub(crate) cache: Option<&'a ClosingCache>,
}

impl<'a> ResolveContext<'a> {
    pub(crate) fn new(observers: &'a Observers, cache: Option<&'a ClosingCache>) -> Self {
        Self { observers, cache }
    }

    /// No observers, no cache.
    pub(crate) fn detached() -> ResolveContext<'static> {
        ResolveContext {
            observers: &NO_OBSERVERS,
            cache: None,
        }
    }

    pub(crate) fn close(&self, implementation: &TypeDescriptor, requested: &TypeDescriptor) -> ClosingResult {
        match self.cache {
            Some(cache) => cache.close(implementation, requested),
            None => close(implementation, requested),
        }
    }
}

/// The resolver owning one service type definition's collection.
#[derive(Debug, Clone)]
pub enum CollectionResolver {
    Controlled(ControlledCollectionResolver),
    Uncontrolled(UncontrolledCollectionResolver),
}

impl CollectionResolver {
    /// Open form of the service type definition.
    pub fn service_type(&self) -> &TypeDescriptor {
        match self {
            CollectionResolver::Controlled(r) => r.service_type(),
            CollectionResolver::Uncontrolled(r) => r.service_type(),
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, CollectionResolver::Controlled(_))
    }

    pub fn resolve(&self, requested: &TypeDescriptor) -> Vec<ControlledItem> {
        self.resolve_with(requested, &ResolveContext::detached())
    }

    pub(crate) fn resolve_with(&self, requested: &TypeDescriptor, ctx: &ResolveContext<'_>) -> Vec<ControlledItem> {
        match self {
            CollectionResolver::Controlled(r) => r.resolve_with(requested, ctx),
            CollectionResolver::Uncontrolled(r) => r.resolve(requested),
        }
    }

    /// Closed service types this resolver can produce a non-empty collection for
    /// without closing open items.
    pub fn known_closed_service_types(&self) -> Vec<TypeDescriptor> {
        match self {
            CollectionResolver::Controlled(r) => r.known_closed_service_types(),
            CollectionResolver::Uncontrolled(r) => r.service_types().cloned().collect(),
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            CollectionResolver::Controlled(r) => r.item_count(),
            CollectionResolver::Uncontrolled(r) => r.item_count(),
        }
    }

    pub(crate) fn describe(&self, key: &CollectionKey) -> CollectionDescriptor {
        let items = match self {
            CollectionResolver::Controlled(r) => r
                .groups()
                .iter()
                .flat_map(|g| {
                    g.items().iter().map(move |item| CollectionItemDescriptor {
                        service_type: g.service_type().clone(),
                        implementation_type: item.implementation_type().clone(),
                        lifetime: item.lifetime(),
                        prebuilt: item.registration().is_some(),
                    })
                })
                .collect(),
            CollectionResolver::Uncontrolled(r) => r
                .service_types()
                .flat_map(|s| {
                    r.registrations_for(s).iter().map(move |registration| CollectionItemDescriptor {
                        service_type: s.clone(),
                        implementation_type: registration.implementation_type().clone(),
                        lifetime: registration.lifetime(),
                        prebuilt: true,
                    })
                })
                .collect(),
        };

        CollectionDescriptor {
            key: key.clone(),
            service_type: self.service_type().clone(),
            controlled: self.is_controlled(),
            items,
        }
    }
}

/// All collection resolvers, in order of first registration.
#[derive(Debug, Clone, Default)]
pub(crate) struct CollectionRegistry {
    resolvers: FastMap<CollectionKey, CollectionResolver>,
    order: Vec<CollectionKey>,
}

impl CollectionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_controlled(
        &mut self,
        service_type: TypeDescriptor,
        items: Vec<ControlledItem>,
        append: bool,
        allow_overriding: bool,
    ) -> DiResult<()> {
        let key = key_of(&service_type)?;
        if let Some(CollectionResolver::Uncontrolled(_)) = self.resolvers.get(&key) {
            return Err(mixed(&service_type, true));
        }

        // a rejected registration must leave the registry untouched
        for item in &items {
            controlled::ensure_applicable(&service_type, item)?;
        }

        if !self.resolvers.contains_key(&key) {
            let open = open_form(&service_type);
            self.insert(key.clone(), CollectionResolver::Controlled(ControlledCollectionResolver::new(open)));
        }

        match self.resolvers.get_mut(&key) {
            Some(CollectionResolver::Controlled(resolver)) => {
                resolver.add_controlled_registrations(service_type, items, append, allow_overriding)
            }
            _ => Err(mixed(&service_type, true)),
        }
    }

    pub(crate) fn add_uncontrolled(
        &mut self,
        service_type: TypeDescriptor,
        registrations: Vec<Registration>,
        allow_overriding: bool,
    ) -> DiResult<()> {
        let key = key_of(&service_type)?;
        if service_type.contains_generic_parameters() {
            return Err(DiError::InvalidServiceType {
                service_type: service_type.to_string(),
            });
        }

        if !self.resolvers.contains_key(&key) {
            let open = open_form(&service_type);
            self.insert(key.clone(), CollectionResolver::Uncontrolled(UncontrolledCollectionResolver::new(open)));
        }

        match self.resolvers.get_mut(&key) {
            Some(CollectionResolver::Uncontrolled(resolver)) => {
                resolver.register(service_type, registrations, allow_overriding)
            }
            _ => Err(mixed(&service_type, false)),
        }
    }

    pub(crate) fn get(&self, service_type: &TypeDescriptor) -> Option<&CollectionResolver> {
        let key = CollectionKey::of(service_type)?;
        self.resolvers.get(&key)
    }

    /// Resolvers in order of first registration.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&CollectionKey, &CollectionResolver)> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.resolvers.get(key).map(|r| (key, r)))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    fn insert(&mut self, key: CollectionKey, resolver: CollectionResolver) {
        self.order.push(key.clone());
        self.resolvers.insert(key, resolver);
    }
}

fn key_of(service_type: &TypeDescriptor) -> DiResult<CollectionKey> {
    CollectionKey::of(service_type).ok_or_else(|| DiError::InvalidServiceType {
        service_type: service_type.to_string(),
    })
}

fn open_form(service_type: &TypeDescriptor) -> TypeDescriptor {
    match service_type.definition() {
        Some(definition) => definition.open(),
        None => service_type.clone(),
    }
}

fn mixed(service_type: &TypeDescriptor, controlled: bool) -> DiError {
    tracing::warn!(service = %service_type, controlled, "mixed controlled and uncontrolled collection registrations");
    DiError::MixedControlledUncontrolledRegistration {
        service_type: service_type.to_string(),
        controlled,
    }
}
