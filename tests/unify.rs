/// Closing open-generic implementations against closed requests
///
/// These tests exercise the unifier through the public `close` function:
/// structural matching, constraint checking, inference from constraint
/// bounds, and the closing cache.

mod common;

use common::{list_definition, t, Model};
use ferrous_generics::types::enumerable_definition;
use ferrous_generics::{close, ClosingCache, ClosingFailure, GenericConstraint, GenericParameter, TypeDefinition, TypeDescriptor};
use proptest::prelude::*;

fn pair_definition() -> std::sync::Arc<TypeDefinition> {
    TypeDefinition::interface("IPair")
        .generic(GenericParameter::new("A"))
        .generic(GenericParameter::new("B"))
        .build()
}

#[test]
fn closes_open_implementation_for_satisfying_argument() {
    let m = Model::new();

    let result = close(&m.repo.open(), &m.repo_of(&m.order));

    assert!(result.success);
    assert!(result.satisfies_constraints);
    assert!(result.failure.is_none());
    assert_eq!(result.closed_implementation, Some(m.repo.make_generic([m.order.descriptor()])));
}

#[test]
fn reference_type_constraint_rejects_value_type() {
    let m = Model::new();

    let result = close(&m.repo.open(), &m.repo_of(&m.int));

    assert!(!result.success);
    assert!(!result.satisfies_constraints);
    assert!(result.closed_implementation.is_none());
    match result.failure {
        Some(ClosingFailure::ConstraintViolation { parameter, argument, constraint }) => {
            assert_eq!(&*parameter, "T");
            assert_eq!(argument, m.int.descriptor());
            assert_eq!(constraint, GenericConstraint::ReferenceType);
        }
        other => panic!("expected a constraint violation, got {:?}", other),
    }
}

#[test]
fn open_request_is_rejected() {
    let m = Model::new();

    let result = close(&m.repo.open(), &m.irepo.open());

    assert!(!result.success);
    assert!(matches!(result.failure, Some(ClosingFailure::RequestedServiceNotClosed { .. })));
}

#[test]
fn unrelated_service_does_not_match() {
    let m = Model::new();

    let result = close(&m.null_validator.open(), &m.repo_of(&m.order));

    assert!(matches!(result.failure, Some(ClosingFailure::NoMatchingServiceType { .. })));
}

#[test]
fn closed_implementation_succeeds_only_when_assignable() {
    let m = Model::new();

    let result = close(&m.order_repo.descriptor(), &m.repo_of(&m.order));
    assert_eq!(result.closed_implementation, Some(m.order_repo.descriptor()));

    let result = close(&m.order_repo.descriptor(), &m.repo_of(&m.customer));
    assert!(!result.success);
}

#[test]
fn base_type_constraint_follows_inheritance() {
    let m = Model::new();
    let open = m.entity_validator.open();

    assert!(close(&open, &m.validator_of(&m.order)).success);
    assert!(close(&open, &m.validator_of(&m.special_order)).success);
    assert!(close(&open, &m.validator_of(&m.customer)).is_constraint_violation());
}

#[test]
fn default_constructor_constraint() {
    let m = Model::new();
    let factory = TypeDefinition::class("Factory")
        .generic(GenericParameter::new("T").default_constructor())
        .implements(m.irepo.make_generic([t()]))
        .build();

    assert!(close(&factory.open(), &m.repo_of(&m.customer)).success);
    assert!(close(&factory.open(), &m.repo_of(&m.int)).success);
    assert!(close(&factory.open(), &m.repo_of(&m.entity)).is_constraint_violation());
}

#[test]
fn value_type_constraint() {
    let m = Model::new();
    let boxed = TypeDefinition::class("BoxedRepo")
        .generic(GenericParameter::new("T").value_type())
        .implements(m.irepo.make_generic([t()]))
        .build();

    assert!(close(&boxed.open(), &m.repo_of(&m.int)).success);
    assert!(close(&boxed.open(), &m.repo_of(&m.order)).is_constraint_violation());
}

#[test]
fn infers_parameter_from_constraint_bound() {
    let iprocessor = TypeDefinition::interface("IProcessor").generic(GenericParameter::new("T")).build();
    let item = TypeDescriptor::parameter("TItem");
    let flattener = TypeDefinition::class("Flattener")
        .generic(GenericParameter::new("T").implements(enumerable_definition().make_generic([item.clone()])))
        .generic(GenericParameter::new("TItem"))
        .implements(iprocessor.make_generic([t()]))
        .build();
    let list = list_definition();
    let order = TypeDefinition::class("Order").build();
    let list_of_orders = list.make_generic([order.descriptor()]);

    let result = close(&flattener.open(), &iprocessor.make_generic([list_of_orders.clone()]));

    assert_eq!(
        result.closed_implementation.map(|c| c.to_string()).as_deref(),
        Some("Flattener<List<Order>, Order>")
    );

    // the bound cannot be met by a type that is not enumerable
    let result = close(&flattener.open(), &iprocessor.make_generic([order.descriptor()]));
    assert!(matches!(result.failure, Some(ClosingFailure::UnboundParameter { .. })));
}

#[test]
fn parameter_missing_from_service_is_unbound() {
    let m = Model::new();
    let extra = TypeDefinition::class("ExtraRepo")
        .generic(GenericParameter::new("T"))
        .generic(GenericParameter::new("U"))
        .implements(m.irepo.make_generic([t()]))
        .build();

    let result = close(&extra.open(), &m.repo_of(&m.order));

    assert_eq!(result.failure, Some(ClosingFailure::UnboundParameter { parameter: "U".into() }));
}

#[test]
fn repeated_parameter_binds_consistently() {
    let m = Model::new();
    let ipair = pair_definition();
    let same = TypeDefinition::class("SamePair")
        .generic(GenericParameter::new("T"))
        .implements(ipair.make_generic([t(), t()]))
        .build();

    let ok = close(&same.open(), &ipair.make_generic([m.order.descriptor(), m.order.descriptor()]));
    assert_eq!(ok.closed_implementation, Some(same.make_generic([m.order.descriptor()])));

    let mismatch = close(&same.open(), &ipair.make_generic([m.order.descriptor(), m.customer.descriptor()]));
    assert!(!mismatch.success);
}

#[test]
fn partially_closed_and_reordered_arguments() {
    let m = Model::new();
    let ipair = pair_definition();
    let a = TypeDescriptor::parameter("A");
    let b = TypeDescriptor::parameter("B");
    let order_pair = TypeDefinition::class("OrderPair")
        .generic(GenericParameter::new("T"))
        .implements(ipair.make_generic([m.order.descriptor(), t()]))
        .build();
    let swap = TypeDefinition::class("Swap")
        .generic(GenericParameter::new("A"))
        .generic(GenericParameter::new("B"))
        .implements(ipair.make_generic([b, a]))
        .build();

    let request = ipair.make_generic([m.order.descriptor(), m.customer.descriptor()]);
    assert_eq!(
        close(&order_pair.open(), &request).closed_implementation,
        Some(order_pair.make_generic([m.customer.descriptor()]))
    );
    assert_eq!(
        close(&swap.open(), &request).closed_implementation,
        Some(swap.make_generic([m.customer.descriptor(), m.order.descriptor()]))
    );

    let wrong_first = ipair.make_generic([m.customer.descriptor(), m.customer.descriptor()]);
    assert!(!close(&order_pair.open(), &wrong_first).success);
}

#[test]
fn closes_through_base_class_and_nested_arguments() {
    let m = Model::new();
    let list = list_definition();
    let base_repo = TypeDefinition::class("RepoBase")
        .abstract_class()
        .generic(GenericParameter::new("T"))
        .implements(m.irepo.make_generic([t()]))
        .build();
    let derived = TypeDefinition::class("SqlRepo")
        .generic(GenericParameter::new("T"))
        .extends(base_repo.make_generic([t()]))
        .build();
    let list_repo = TypeDefinition::class("ListRepo")
        .generic(GenericParameter::new("T"))
        .implements(m.irepo.make_generic([list.make_generic([t()])]))
        .build();

    assert_eq!(
        close(&derived.open(), &m.repo_of(&m.order)).closed_implementation,
        Some(derived.make_generic([m.order.descriptor()]))
    );

    let list_of_orders = m.irepo.make_generic([list.make_generic([m.order.descriptor()])]);
    assert_eq!(
        close(&list_repo.open(), &list_of_orders).closed_implementation,
        Some(list_repo.make_generic([m.order.descriptor()]))
    );
    assert!(!close(&list_repo.open(), &m.repo_of(&m.order)).success);
}

#[test]
fn later_candidate_can_succeed() {
    let m = Model::new();
    let ipair = pair_definition();
    let both = TypeDefinition::class("BothWays")
        .implements(ipair.make_generic([m.order.descriptor(), m.customer.descriptor()]))
        .implements(ipair.make_generic([m.customer.descriptor(), m.order.descriptor()]))
        .build();

    let request = ipair.make_generic([m.customer.descriptor(), m.order.descriptor()]);
    assert_eq!(close(&both.descriptor(), &request).closed_implementation, Some(both.descriptor()));
}

#[test]
fn cache_returns_the_same_results() {
    let m = Model::new();
    let cache = ClosingCache::new();
    let requests = [m.repo_of(&m.order), m.repo_of(&m.int), m.repo_of(&m.customer)];

    for request in &requests {
        let direct = close(&m.repo.open(), request);
        assert_eq!(cache.close(&m.repo.open(), request), direct);
        assert_eq!(cache.close(&m.repo.open(), request), direct);
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().misses, 3);
    assert_eq!(cache.stats().hits, 3);
    assert!((cache.stats().hit_ratio() - 50.0).abs() < f64::EPSILON);
}

fn entity_strategy() -> impl Strategy<Value = usize> {
    0usize..5
}

fn implementation_strategy() -> impl Strategy<Value = usize> {
    0usize..4
}

fn pick_entity(m: &Model, index: usize) -> TypeDescriptor {
    [&m.order, &m.customer, &m.int, &m.entity, &m.special_order][index].descriptor()
}

fn pick_implementation(m: &Model, index: usize) -> TypeDescriptor {
    [m.repo.open(), m.cached_repo.open(), m.order_repo.descriptor(), m.entity_validator.open()][index].clone()
}

proptest! {
    #[test]
    fn closing_is_idempotent(entity in entity_strategy(), implementation in implementation_strategy()) {
        let m = Model::new();
        let request = m.irepo.make_generic([pick_entity(&m, entity)]);
        let open = pick_implementation(&m, implementation);

        let first = close(&open, &request);
        let second = close(&open, &request);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn reference_constraint_decides_success(entity in entity_strategy()) {
        let m = Model::new();
        let argument = pick_entity(&m, entity);
        let result = close(&m.repo.open(), &m.irepo.make_generic([argument.clone()]));

        prop_assert_eq!(result.success, argument.is_reference_type());
        prop_assert_eq!(result.success, result.closed_implementation.is_some());
        if let Some(closed) = result.closed_implementation {
            prop_assert!(!closed.contains_generic_parameters());
            prop_assert!(closed.is_assignable_to(&m.irepo.make_generic([argument])));
        }
    }
}
