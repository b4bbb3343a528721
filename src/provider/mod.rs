//! Service provider module for collection resolution.
//!
//! This module contains the ServiceProvider type, the locked-phase surface
//! of the container.

use std::sync::Arc;
use std::time::Instant;

use crate::collection::{select_observed, ControlledItem};
use crate::config::ResolverOptions;
use crate::constructor::{ConstructorCandidate, ConstructorResolutionBehavior};
use crate::descriptors::CollectionDescriptor;
use crate::error::{DiError, DiResult};
use crate::generics::{ClosingCache, ClosingCacheStats};
use crate::internal::{CacheLock, FastMap};
use crate::observer::Observers;
use crate::phase::ContainerPhase;
use crate::registration::RegistrationBuilder;
use crate::resolver::{CollectionProducer, CollectionRegistry, CollectionResolver, ResolveContext};
use crate::types::{Parameter, TypeDescriptor};

/// Locked-phase container surface.
///
/// Registrations are frozen; every operation only reads them. The provider
/// can be cloned cheaply and shared across threads. Collection producers
/// are built once per closed service type and cached.
///
/// # Examples
///
/// ```
/// use ferrous_generics::{ServiceCollection, Lifetime, TypeDefinition, TypeDescriptor, GenericParameter};
///
/// let ihandler = TypeDefinition::interface("IHandler").generic(GenericParameter::new("T")).build();
/// let handler = TypeDefinition::class("Handler")
///     .generic(GenericParameter::new("T"))
///     .implements(ihandler.make_generic([TypeDescriptor::parameter("T")]))
///     .default_constructor()
///     .build();
/// let order = TypeDefinition::class("Order").build();
///
/// let mut services = ServiceCollection::new();
/// services.add_collection(ihandler.open(), [handler.open()], Lifetime::Scoped).unwrap();
/// let provider = services.build();
///
/// let request = ihandler.make_generic([order.descriptor()]);
/// let producer = provider.build_collection_producer(&request).unwrap();
///
/// assert_eq!(producer.collection_type().to_string(), "IEnumerable<IHandler<Order>>");
/// assert_eq!(producer.collection().len(), 1);
/// assert_eq!(producer.collection()[0].lifetime(), Lifetime::Scoped);
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    registry: CollectionRegistry,
    observers: Observers,
    options: ResolverOptions,
    constructor_behavior: Arc<dyn ConstructorResolutionBehavior>,
    registration_builder: Arc<dyn RegistrationBuilder>,
    closing_cache: Option<ClosingCache>,
    producers: CacheLock<FastMap<TypeDescriptor, Arc<CollectionProducer>>>,
}

impl ServiceProvider {
    pub(crate) fn new(
        registry: CollectionRegistry,
        observers: Observers,
        options: ResolverOptions,
        constructor_behavior: Arc<dyn ConstructorResolutionBehavior>,
        registration_builder: Arc<dyn RegistrationBuilder>,
    ) -> Self {
        let closing_cache = options.cache_closed_types.then(ClosingCache::new);
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                observers,
                options,
                constructor_behavior,
                registration_builder,
                closing_cache,
                producers: CacheLock::new(FastMap::default()),
            }),
        }
    }

    /// Always [`ContainerPhase::Locked`].
    pub fn phase(&self) -> ContainerPhase {
        ContainerPhase::Locked
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.inner.options
    }

    /// The producer for the collection of `service_type`.
    ///
    /// `service_type` must be closed. A service type nobody registered a
    /// collection for yields an empty producer.
    pub fn build_collection_producer(&self, service_type: &TypeDescriptor) -> DiResult<Arc<CollectionProducer>> {
        if service_type.is_parameter() {
            return Err(DiError::InvalidServiceType {
                service_type: service_type.to_string(),
            });
        }
        if service_type.contains_generic_parameters() {
            return Err(DiError::RequestedServiceNotClosed {
                service_type: service_type.to_string(),
            });
        }

        if let Some(producer) = self.inner.producers.read().get(service_type) {
            return Ok(producer.clone());
        }

        let started = Instant::now();
        let ctx = ResolveContext::new(&self.inner.observers, self.inner.closing_cache.as_ref());
        let items = match self.inner.registry.get(service_type) {
            Some(resolver) => resolver.resolve_with(service_type, &ctx),
            None => Vec::new(),
        };
        let producer = Arc::new(CollectionProducer::new(
            service_type.clone(),
            items,
            self.inner.registration_builder.as_ref(),
        ));
        let duration = started.elapsed();

        tracing::debug!(service = %service_type, items = producer.items().len(), ?duration, "built collection producer");
        if self.inner.observers.has_observers() {
            self.inner
                .observers
                .collection_built(service_type, producer.items().len(), duration);
        }

        // a concurrent build may have won; hand out the stored one
        let stored = self
            .inner
            .producers
            .write()
            .entry(service_type.clone())
            .or_insert(producer)
            .clone();
        Ok(stored)
    }

    /// Items making up the collection for `service_type`, in order.
    pub fn resolve_collection(&self, service_type: &TypeDescriptor) -> DiResult<Vec<ControlledItem>> {
        Ok(self.build_collection_producer(service_type)?.items().to_vec())
    }

    /// Closed service types the registered closed implementations satisfy
    /// for the definition of `service_type`.
    pub fn known_closed_service_types(&self, service_type: &TypeDescriptor) -> Vec<TypeDescriptor> {
        self.inner
            .registry
            .get(service_type)
            .map(CollectionResolver::known_closed_service_types)
            .unwrap_or_default()
    }

    /// The resolver owning the definition of `service_type`, if any.
    pub fn collection_resolver(&self, service_type: &TypeDescriptor) -> Option<&CollectionResolver> {
        self.inner.registry.get(service_type)
    }

    /// Selects the constructor of `implementation` for construction.
    ///
    /// With the default behavior, types with several public constructors
    /// only consider those whose parameters `can_resolve` accepts.
    pub fn select_constructor(
        &self,
        implementation: &TypeDescriptor,
        can_resolve: &dyn Fn(&Parameter) -> bool,
    ) -> DiResult<ConstructorCandidate> {
        select_observed(
            self.inner.constructor_behavior.as_ref(),
            &self.inner.observers,
            implementation,
            self.phase(),
            can_resolve,
        )
    }

    /// Statistics of the closing cache, `None` when caching is disabled.
    pub fn closing_cache_stats(&self) -> Option<ClosingCacheStats> {
        self.inner.closing_cache.as_ref().map(ClosingCache::stats)
    }

    pub fn get_collection_descriptors(&self) -> Vec<CollectionDescriptor> {
        self.inner
            .registry
            .iter()
            .map(|(key, resolver)| resolver.describe(key))
            .collect()
    }
}
