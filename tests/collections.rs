/// Collection registration and resolution
///
/// These tests verify how registered groups turn into resolved collections:
/// closing of open items, ordering, deduplication, append and replace
/// semantics, registration-time validation and uncontrolled collections.

mod common;

use common::{names, Model};
use ferrous_generics::{
    ClosingFailure, ControlledItem, DiError, Lifetime, Registration, RegistrationBuilder, ResolutionObserver,
    ResolverOptions, ServiceCollection, TypeDefinition, TypeDescriptor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn implementations(items: &[ControlledItem]) -> Vec<String> {
    names(items.iter().map(ControlledItem::implementation_type))
}

#[test]
fn open_repository_closes_only_for_reference_types() {
    let m = Model::new();
    let mut services = ServiceCollection::new();
    services.add_collection(m.irepo.open(), [m.repo.open()], Lifetime::Transient).unwrap();
    let provider = services.build();

    let orders = provider.resolve_collection(&m.repo_of(&m.order)).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].implementation_type(), &m.repo.make_generic([m.order.descriptor()]));
    assert_eq!(orders[0].lifetime(), Lifetime::Transient);
    assert!(orders[0].registration().is_none());

    let ints = provider.resolve_collection(&m.repo_of(&m.int)).unwrap();
    assert!(ints.is_empty());
}

#[test]
fn items_follow_group_then_item_order() {
    let m = Model::new();
    let mut services = ServiceCollection::new();
    services
        .add_collection(
            m.ivalidator.open(),
            [m.null_validator.open(), m.order_validator.descriptor()],
            Lifetime::Transient,
        )
        .unwrap()
        .append_to_collection(m.ivalidator.open(), m.entity_validator.open(), Lifetime::Scoped)
        .unwrap();
    let provider = services.build();

    let order_validators = provider.resolve_collection(&m.validator_of(&m.order)).unwrap();
    assert_eq!(
        implementations(&order_validators),
        ["NullValidator<Order>", "OrderValidator", "EntityValidator<Order>"]
    );
    assert_eq!(order_validators[2].lifetime(), Lifetime::Scoped);

    // Customer is not an Entity and OrderValidator only serves orders
    let customer_validators = provider.resolve_collection(&m.validator_of(&m.customer)).unwrap();
    assert_eq!(implementations(&customer_validators), ["NullValidator<Customer>"]);
}

#[test]
fn resolving_twice_yields_identical_order() {
    let m = Model::new();
    let build = |cache: bool| {
        let mut services = ServiceCollection::with_options(ResolverOptions {
            cache_closed_types: cache,
            ..ResolverOptions::default()
        });
        services
            .add_collection(
                m.irepo.open(),
                [m.cached_repo.open(), m.order_repo.descriptor(), m.repo.open()],
                Lifetime::Transient,
            )
            .unwrap();
        services.build()
    };

    let cached = build(true);
    let uncached = build(false);
    let request = m.repo_of(&m.order);

    let first = cached.resolve_collection(&request).unwrap();
    let second = cached.resolve_collection(&request).unwrap();
    let third = uncached.resolve_collection(&request).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(implementations(&first), ["CachedRepo<Order>", "OrderRepo", "Repo<Order>"]);
    assert!(uncached.closing_cache_stats().is_none());
    assert!(cached.closing_cache_stats().is_some());
}

#[test]
fn non_generic_service_returns_items_as_registered() {
    let ilogger = TypeDefinition::interface("ILogger").build();
    let console = TypeDefinition::class("ConsoleLogger").implements(ilogger.descriptor()).build();
    let file = TypeDefinition::class("FileLogger").implements(ilogger.descriptor()).build();

    let mut services = ServiceCollection::new();
    services
        .add_collection(ilogger.descriptor(), [console.descriptor(), file.descriptor()], Lifetime::Singleton)
        .unwrap();
    let provider = services.build();

    let loggers = provider.resolve_collection(&ilogger.descriptor()).unwrap();
    assert_eq!(implementations(&loggers), ["ConsoleLogger", "FileLogger"]);
}

#[test]
fn built_registrations_are_never_rebuilt() {
    let m = Model::new();
    let prebuilt = Registration::new(m.order_repo.descriptor(), Lifetime::Singleton);

    let mut services = ServiceCollection::new();
    services
        .append_registration(m.irepo.open(), prebuilt.clone())
        .unwrap()
        .append_to_collection(m.irepo.open(), m.repo.open(), Lifetime::Transient)
        .unwrap();
    let provider = services.build();

    let producer = provider.build_collection_producer(&m.repo_of(&m.order)).unwrap();
    assert_eq!(producer.items()[0], ControlledItem::from_registration(prebuilt.clone()));
    assert_eq!(producer.collection()[0], prebuilt);
    assert_ne!(producer.collection()[1], prebuilt);

    // the prebuilt repository only serves orders
    let customers = provider.resolve_collection(&m.repo_of(&m.customer)).unwrap();
    assert_eq!(implementations(&customers), ["Repo<Customer>"]);
}

#[test]
fn duplicates_are_removed_without_reordering() {
    let m = Model::new();
    let mut services = ServiceCollection::new();
    services
        .add_collection(
            m.irepo.open(),
            [m.repo.open(), m.cached_repo.open(), m.repo.open()],
            Lifetime::Transient,
        )
        .unwrap()
        .append_to_collection(m.irepo.open(), m.cached_repo.open(), Lifetime::Transient)
        .unwrap()
        .append_to_collection(m.irepo.open(), m.cached_repo.open(), Lifetime::Singleton)
        .unwrap();
    let provider = services.build();

    let items = provider.resolve_collection(&m.repo_of(&m.order)).unwrap();
    assert_eq!(implementations(&items), ["Repo<Order>", "CachedRepo<Order>", "CachedRepo<Order>"]);
    assert_eq!(items[1].lifetime(), Lifetime::Transient);
    assert_eq!(items[2].lifetime(), Lifetime::Singleton);
}

#[test]
fn non_appending_registration_replaces_in_place() {
    let m = Model::new();
    let mut services = ServiceCollection::new();
    services
        .add_collection(m.ivalidator.open(), [m.null_validator.open()], Lifetime::Transient)
        .unwrap()
        .append_to_collection(m.ivalidator.open(), m.entity_validator.open(), Lifetime::Transient)
        .unwrap()
        .add_collection(m.ivalidator.open(), [m.order_validator.descriptor()], Lifetime::Transient)
        .unwrap();

    let descriptors = services.get_collection_descriptors();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].item_count(), 2);

    let provider = services.build();
    let items = provider.resolve_collection(&m.validator_of(&m.order)).unwrap();
    assert_eq!(implementations(&items), ["OrderValidator", "EntityValidator<Order>"]);
}

#[test]
fn replacing_fails_when_overriding_is_disabled() {
    let m = Model::new();
    let mut services = ServiceCollection::with_options(ResolverOptions {
        allow_overriding_registrations: false,
        ..ResolverOptions::default()
    });
    services.add_collection(m.irepo.open(), [m.repo.open()], Lifetime::Transient).unwrap();

    // appending is still fine
    services
        .append_to_collection(m.irepo.open(), m.cached_repo.open(), Lifetime::Transient)
        .unwrap();

    let err = services
        .add_collection(m.irepo.open(), [m.cached_repo.open()], Lifetime::Transient)
        .err()
        .unwrap();
    assert_eq!(
        err,
        DiError::CollectionAlreadyRegistered {
            service_type: "IRepo<T>".to_string()
        }
    );
}

#[test]
fn implementations_must_serve_the_service_type() {
    let m = Model::new();
    let mut services = ServiceCollection::new();

    let err = services
        .add_collection(m.irepo.open(), [m.null_validator.open()], Lifetime::Transient)
        .err()
        .unwrap();
    assert!(matches!(err, DiError::ImplementationNotAssignable { .. }));

    let err = services
        .append_to_collection(m.repo_of(&m.customer), m.order_repo.descriptor(), Lifetime::Transient)
        .err()
        .unwrap();
    assert_eq!(
        err,
        DiError::ImplementationNotAssignable {
            service_type: "IRepo<Customer>".to_string(),
            implementation: "OrderRepo".to_string(),
        }
    );

    let err = services
        .append_to_collection(m.repo_of(&m.int), m.repo.open(), Lifetime::Transient)
        .err()
        .unwrap();
    assert!(matches!(err, DiError::ImplementationNotAssignable { .. }));

    // nothing was registered by the failing calls
    assert!(services.get_collection_descriptors().is_empty());
}

#[test]
fn rejected_controlled_registration_leaves_definition_unclaimed() {
    let m = Model::new();
    let registration = Registration::new(m.order_repo.descriptor(), Lifetime::Transient);
    let mut services = ServiceCollection::new();

    let err = services
        .add_collection(m.irepo.open(), [m.null_validator.open()], Lifetime::Transient)
        .err()
        .unwrap();
    assert!(matches!(err, DiError::ImplementationNotAssignable { .. }));

    services
        .register_uncontrolled_collection(m.repo_of(&m.order), [registration.clone()])
        .unwrap();

    let descriptors = services.get_collection_descriptors();
    assert_eq!(descriptors.len(), 1);
    assert!(!descriptors[0].controlled);

    let provider = services.build();
    let items = provider.resolve_collection(&m.repo_of(&m.order)).unwrap();
    assert_eq!(items, [ControlledItem::from_registration(registration)]);
}

#[test]
fn closed_group_serves_only_assignable_requests() {
    let m = Model::new();
    let mut services = ServiceCollection::new();
    services
        .append_to_collection(m.repo_of(&m.order), m.order_repo.descriptor(), Lifetime::Transient)
        .unwrap()
        .append_to_collection(m.repo_of(&m.order), m.repo.open(), Lifetime::Transient)
        .unwrap();
    let provider = services.build();

    let orders = provider.resolve_collection(&m.repo_of(&m.order)).unwrap();
    assert_eq!(implementations(&orders), ["OrderRepo", "Repo<Order>"]);
    assert!(provider.resolve_collection(&m.repo_of(&m.customer)).unwrap().is_empty());
}

#[test]
fn uncontrolled_collection_is_returned_unchanged() {
    let m = Model::new();
    let first = Registration::new(m.order_repo.descriptor(), Lifetime::Singleton);
    let second = Registration::new(m.order_repo.descriptor(), Lifetime::Singleton);

    let mut services = ServiceCollection::new();
    services
        .register_uncontrolled_collection(m.repo_of(&m.order), [first.clone(), second.clone()])
        .unwrap();
    let provider = services.build();

    let producer = provider.build_collection_producer(&m.repo_of(&m.order)).unwrap();
    assert_eq!(producer.collection().iter().cloned().collect::<Vec<_>>(), [first, second]);
    assert!(provider.resolve_collection(&m.repo_of(&m.customer)).unwrap().is_empty());
    assert_eq!(provider.known_closed_service_types(&m.irepo.open()), [m.repo_of(&m.order)]);
}

#[test]
fn uncontrolled_collection_requires_closed_service() {
    let m = Model::new();
    let mut services = ServiceCollection::new();

    let err = services
        .register_uncontrolled_collection(m.irepo.open(), Vec::new())
        .err()
        .unwrap();
    assert!(matches!(err, DiError::InvalidServiceType { .. }));
}

#[test]
fn controlled_and_uncontrolled_never_mix() {
    let m = Model::new();
    let registration = Registration::new(m.order_repo.descriptor(), Lifetime::Transient);

    let mut services = ServiceCollection::new();
    services.add_collection(m.irepo.open(), [m.repo.open()], Lifetime::Transient).unwrap();
    let err = services
        .register_uncontrolled_collection(m.repo_of(&m.order), [registration.clone()])
        .err()
        .unwrap();
    assert_eq!(
        err,
        DiError::MixedControlledUncontrolledRegistration {
            service_type: "IRepo<Order>".to_string(),
            controlled: false,
        }
    );

    let mut services = ServiceCollection::new();
    services
        .register_uncontrolled_collection(m.repo_of(&m.order), [registration])
        .unwrap();
    let err = services
        .add_collection(m.irepo.open(), [m.repo.open()], Lifetime::Transient)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        DiError::MixedControlledUncontrolledRegistration { controlled: true, .. }
    ));
}

#[test]
fn known_closed_service_types_come_from_closed_items() {
    let m = Model::new();
    let multi = TypeDefinition::class("MultiRepo")
        .implements(m.repo_of(&m.order))
        .implements(m.repo_of(&m.customer))
        .build();

    let mut services = ServiceCollection::new();
    services
        .add_collection(
            m.irepo.open(),
            [m.repo.open(), m.order_repo.descriptor(), multi.descriptor()],
            Lifetime::Transient,
        )
        .unwrap();
    let provider = services.build();

    let known = provider.known_closed_service_types(&m.repo_of(&m.int));
    assert_eq!(known, [m.repo_of(&m.order), m.repo_of(&m.customer)]);

    let unrelated = TypeDefinition::interface("IUnknown").build();
    assert!(provider.known_closed_service_types(&unrelated.descriptor()).is_empty());
}

#[derive(Default)]
struct CountingBuilder {
    built: AtomicUsize,
}

impl RegistrationBuilder for CountingBuilder {
    fn build(&self, implementation_type: &TypeDescriptor, lifetime: Lifetime) -> Registration {
        self.built.fetch_add(1, Ordering::SeqCst);
        Registration::new(implementation_type.clone(), lifetime)
    }
}

#[test]
fn producers_are_built_once_per_closed_type() {
    let m = Model::new();
    let builder = Arc::new(CountingBuilder::default());

    let mut services = ServiceCollection::new();
    services
        .add_collection(m.irepo.open(), [m.repo.open(), m.cached_repo.open()], Lifetime::Scoped)
        .unwrap()
        .set_registration_builder(builder.clone());
    let provider = services.build();

    let request = m.repo_of(&m.order);
    let first = provider.build_collection_producer(&request).unwrap();
    let again = provider.build_collection_producer(&request).unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(builder.built.load(Ordering::SeqCst), 2);
    assert_eq!(first.service_type(), &request);
    assert_eq!(first.collection_type().to_string(), "IEnumerable<IRepo<Order>>");
    assert_eq!(first.collection().element_type(), &request);
    assert!(first.collection().iter().all(|r| r.lifetime() == Lifetime::Scoped));

    provider.build_collection_producer(&m.repo_of(&m.customer)).unwrap();
    assert_eq!(builder.built.load(Ordering::SeqCst), 4);
}

#[test]
fn requests_must_be_closed_service_types() {
    let m = Model::new();
    let provider = ServiceCollection::new().build();

    let err = provider.build_collection_producer(&m.irepo.open()).err().unwrap();
    assert!(matches!(err, DiError::RequestedServiceNotClosed { .. }));

    let err = provider
        .build_collection_producer(&TypeDescriptor::parameter("T"))
        .err()
        .unwrap();
    assert!(matches!(err, DiError::InvalidServiceType { .. }));

    // nothing registered is an empty collection, not an error
    let producer = provider.build_collection_producer(&m.repo_of(&m.order)).unwrap();
    assert!(producer.collection().is_empty());
}

#[derive(Default)]
struct Recorder {
    closed: Mutex<Vec<String>>,
    discarded: Mutex<Vec<(String, ClosingFailure)>>,
    built: Mutex<Vec<(String, usize)>>,
}

impl ResolutionObserver for Recorder {
    fn item_closed(&self, _service: &TypeDescriptor, _open: &TypeDescriptor, closed: &TypeDescriptor) {
        self.closed.lock().unwrap().push(closed.to_string());
    }

    fn item_discarded(&self, _service: &TypeDescriptor, implementation: &TypeDescriptor, failure: &ClosingFailure) {
        self.discarded
            .lock()
            .unwrap()
            .push((implementation.to_string(), failure.clone()));
    }

    fn collection_built(&self, service: &TypeDescriptor, item_count: usize, _duration: Duration) {
        self.built.lock().unwrap().push((service.to_string(), item_count));
    }
}

#[test]
fn observers_see_silent_discards() {
    let m = Model::new();
    let recorder = Arc::new(Recorder::default());

    let mut services = ServiceCollection::new();
    services
        .add_collection(m.irepo.open(), [m.repo.open(), m.cached_repo.open()], Lifetime::Transient)
        .unwrap()
        .add_observer(recorder.clone());
    let provider = services.build();

    let items = provider.resolve_collection(&m.repo_of(&m.int)).unwrap();
    assert_eq!(implementations(&items), ["CachedRepo<Int32>"]);

    assert_eq!(recorder.closed.lock().unwrap().as_slice(), ["CachedRepo<Int32>"]);
    let discarded = recorder.discarded.lock().unwrap();
    assert_eq!(discarded.len(), 1);
    assert_eq!(discarded[0].0, "Repo<T>");
    assert!(matches!(discarded[0].1, ClosingFailure::ConstraintViolation { .. }));
    assert_eq!(recorder.built.lock().unwrap().as_slice(), [("IRepo<Int32>".to_string(), 1)]);
}
