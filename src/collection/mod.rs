//! Service collection module for collection registration.
//!
//! This module contains the ServiceCollection type, the registration-phase
//! surface of the container. Building it into a
//! [`ServiceProvider`](crate::ServiceProvider) locks the registrations.

use std::sync::Arc;

use crate::config::ResolverOptions;
use crate::constructor::{ConstructorCandidate, ConstructorResolutionBehavior};
use crate::descriptors::CollectionDescriptor;
use crate::error::DiResult;
use crate::lifetime::Lifetime;
use crate::observer::{Observers, ResolutionObserver};
use crate::phase::ContainerPhase;
use crate::provider::ServiceProvider;
use crate::registration::{LifestyleRegistrationBuilder, Registration, RegistrationBuilder};
use crate::resolver::CollectionRegistry;
use crate::types::{Parameter, TypeDescriptor};

mod group;
mod item;
pub mod module_system;

pub use group::RegistrationGroup;
pub use item::ControlledItem;
pub use module_system::*;

/// Registration-phase container surface.
///
/// Collects collection registrations, validates each one as it is made,
/// and turns into a [`ServiceProvider`] with [`build`](Self::build).
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{ServiceCollection, Lifetime, TypeDefinition, TypeDescriptor, GenericParameter};
///
/// let irepo = TypeDefinition::interface("IRepo").generic(GenericParameter::new("T")).build();
/// let repo = TypeDefinition::class("Repo")
///     .generic(GenericParameter::new("T").reference_type())
///     .implements(irepo.make_generic([TypeDescriptor::parameter("T")]))
///     .build();
/// let order = TypeDefinition::class("Order").build();
/// let int = TypeDefinition::structure("Int32").build();
///
/// let mut services = ServiceCollection::new();
/// services.add_collection(irepo.open(), [repo.open()], Lifetime::Transient).unwrap();
/// let provider = services.build();
///
/// let orders = provider.resolve_collection(&irepo.make_generic([order.descriptor()])).unwrap();
/// assert_eq!(orders[0].implementation_type().to_string(), "Repo<Order>");
///
/// let ints = provider.resolve_collection(&irepo.make_generic([int.descriptor()])).unwrap();
/// assert!(ints.is_empty());
/// ```
pub struct ServiceCollection {
    registry: CollectionRegistry,
    observers: Observers,
    options: ResolverOptions,
    constructor_behavior: Arc<dyn ConstructorResolutionBehavior>,
    registration_builder: Arc<dyn RegistrationBuilder>,
}

impl ServiceCollection {
    /// Creates a new empty service collection with default options.
    pub fn new() -> Self {
        Self::with_options(ResolverOptions::default())
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            registry: CollectionRegistry::new(),
            observers: Observers::new(),
            constructor_behavior: options.constructor_resolution.behavior(),
            registration_builder: Arc::new(LifestyleRegistrationBuilder),
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Always [`ContainerPhase::Registering`].
    pub fn phase(&self) -> ContainerPhase {
        ContainerPhase::Registering
    }

    // ----- Collection Registrations -----

    /// Registers container-controlled items for `service_type`.
    ///
    /// With `append` the items form a new group after the existing ones;
    /// without it they replace the items of the existing non-appended
    /// group for the same service type (or fail with
    /// [`DiError::CollectionAlreadyRegistered`](crate::DiError::CollectionAlreadyRegistered)
    /// when overriding is disabled).
    ///
    /// Every item must be able to serve `service_type`; otherwise the call
    /// fails with [`DiError::ImplementationNotAssignable`](crate::DiError::ImplementationNotAssignable)
    /// and nothing is registered.
    pub fn register_controlled_items(
        &mut self,
        service_type: TypeDescriptor,
        items: impl IntoIterator<Item = ControlledItem>,
        append: bool,
    ) -> DiResult<&mut Self> {
        let items: Vec<ControlledItem> = items.into_iter().collect();
        self.registry
            .add_controlled(service_type, items, append, self.options.allow_overriding_registrations)?;
        Ok(self)
    }

    /// Registers the collection for `service_type`, replacing an earlier
    /// non-appended registration.
    pub fn add_collection(
        &mut self,
        service_type: TypeDescriptor,
        implementations: impl IntoIterator<Item = TypeDescriptor>,
        lifetime: Lifetime,
    ) -> DiResult<&mut Self> {
        let items = implementations
            .into_iter()
            .map(|implementation| ControlledItem::from_type(implementation, lifetime));
        self.register_controlled_items(service_type, items, false)
    }

    /// Appends one implementation to the collection for `service_type`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_generics::{ServiceCollection, Lifetime, TypeDefinition, TypeDescriptor, GenericParameter};
    ///
    /// let ihandler = TypeDefinition::interface("IHandler").generic(GenericParameter::new("T")).build();
    /// let order = TypeDefinition::class("Order").build();
    /// let logging = TypeDefinition::class("LoggingHandler")
    ///     .generic(GenericParameter::new("T"))
    ///     .implements(ihandler.make_generic([TypeDescriptor::parameter("T")]))
    ///     .build();
    /// let order_handler = TypeDefinition::class("OrderHandler")
    ///     .implements(ihandler.make_generic([order.descriptor()]))
    ///     .build();
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .append_to_collection(ihandler.make_generic([order.descriptor()]), order_handler.descriptor(), Lifetime::Transient)
    ///     .unwrap()
    ///     .append_to_collection(ihandler.open(), logging.open(), Lifetime::Singleton)
    ///     .unwrap();
    ///
    /// let provider = services.build();
    /// let names: Vec<String> = provider
    ///     .resolve_collection(&ihandler.make_generic([order.descriptor()]))
    ///     .unwrap()
    ///     .iter()
    ///     .map(|item| item.implementation_type().to_string())
    ///     .collect();
    /// assert_eq!(names, ["OrderHandler", "LoggingHandler<Order>"]);
    /// ```
    pub fn append_to_collection(
        &mut self,
        service_type: TypeDescriptor,
        implementation: TypeDescriptor,
        lifetime: Lifetime,
    ) -> DiResult<&mut Self> {
        self.register_controlled_items(service_type, [ControlledItem::from_type(implementation, lifetime)], true)
    }

    /// Appends an already built registration to the collection for `service_type`.
    ///
    /// The registration is returned as-is for every request its
    /// implementation applies to; it is never rebuilt.
    pub fn append_registration(&mut self, service_type: TypeDescriptor, registration: Registration) -> DiResult<&mut Self> {
        self.register_controlled_items(service_type, [ControlledItem::from_registration(registration)], true)
    }

    /// Registers a collection of finished registrations for one closed
    /// service type.
    ///
    /// Resolution returns these unchanged, and only for exactly
    /// `service_type`. A service type definition used here cannot also
    /// take container-controlled registrations.
    pub fn register_uncontrolled_collection(
        &mut self,
        service_type: TypeDescriptor,
        registrations: impl IntoIterator<Item = Registration>,
    ) -> DiResult<&mut Self> {
        self.registry.add_uncontrolled(
            service_type,
            registrations.into_iter().collect(),
            self.options.allow_overriding_registrations,
        )?;
        Ok(self)
    }

    // ----- Collaborators -----

    /// Registers an observer for resolution events.
    ///
    /// Observers registered here are carried into the provider built from
    /// this collection.
    pub fn add_observer(&mut self, observer: Arc<dyn ResolutionObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Replaces the builder that turns closed items into registrations.
    pub fn set_registration_builder(&mut self, builder: Arc<dyn RegistrationBuilder>) -> &mut Self {
        self.registration_builder = builder;
        self
    }

    /// Replaces the constructor resolution behavior chosen by the options.
    pub fn set_constructor_resolution_behavior(&mut self, behavior: Arc<dyn ConstructorResolutionBehavior>) -> &mut Self {
        self.constructor_behavior = behavior;
        self
    }

    // ----- Constructor Selection -----

    /// Selects the constructor of `implementation` while registering.
    ///
    /// With the default behavior no resolvability filtering happens in this
    /// phase: the dependency graph may still be incomplete.
    pub fn select_constructor(
        &self,
        implementation: &TypeDescriptor,
        can_resolve: &dyn Fn(&Parameter) -> bool,
    ) -> DiResult<ConstructorCandidate> {
        select_observed(
            self.constructor_behavior.as_ref(),
            &self.observers,
            implementation,
            self.phase(),
            can_resolve,
        )
    }

    // ----- Introspection -----

    /// Describes every registered collection in order of first registration.
    pub fn get_collection_descriptors(&self) -> Vec<CollectionDescriptor> {
        self.registry
            .iter()
            .map(|(key, resolver)| resolver.describe(key))
            .collect()
    }

    /// Locks the registrations and returns the provider.
    ///
    /// This is the only transition out of the registering phase; the
    /// collection is consumed so nothing can be registered afterwards.
    pub fn build(self) -> ServiceProvider {
        tracing::debug!(collections = self.registry.len(), "locking service collection");
        ServiceProvider::new(
            self.registry,
            self.observers,
            self.options,
            self.constructor_behavior,
            self.registration_builder,
        )
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `behavior` and reports the outcome to `tracing` and the observers.
pub(crate) fn select_observed(
    behavior: &dyn ConstructorResolutionBehavior,
    observers: &Observers,
    implementation: &TypeDescriptor,
    phase: ContainerPhase,
    can_resolve: &dyn Fn(&Parameter) -> bool,
) -> DiResult<ConstructorCandidate> {
    match behavior.select_constructor(implementation, phase, can_resolve) {
        Ok(candidate) => {
            tracing::debug!(
                %implementation,
                index = candidate.index(),
                arity = candidate.arity(),
                ?phase,
                "selected constructor"
            );
            observers.constructor_selected(implementation, &candidate, phase);
            Ok(candidate)
        }
        Err(err) => {
            tracing::debug!(%implementation, ?phase, error = %err, "constructor selection failed");
            Err(err)
        }
    }
}
