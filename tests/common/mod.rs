//! Shared type fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use ferrous_generics::types::enumerable_definition;
use ferrous_generics::{Constructor, GenericParameter, Parameter, TypeDefinition, TypeDescriptor};

pub fn t() -> TypeDescriptor {
    TypeDescriptor::parameter("T")
}

/// A small domain model: entities, repositories and validators.
pub struct Model {
    pub order: Arc<TypeDefinition>,
    pub customer: Arc<TypeDefinition>,
    pub int: Arc<TypeDefinition>,
    pub entity: Arc<TypeDefinition>,
    pub special_order: Arc<TypeDefinition>,

    pub irepo: Arc<TypeDefinition>,
    /// `Repo<T> : IRepo<T> where T : class`
    pub repo: Arc<TypeDefinition>,
    /// `CachedRepo<T> : IRepo<T>`, unconstrained
    pub cached_repo: Arc<TypeDefinition>,
    /// `OrderRepo : IRepo<Order>`
    pub order_repo: Arc<TypeDefinition>,

    pub ivalidator: Arc<TypeDefinition>,
    /// `NullValidator<T> : IValidator<T>`
    pub null_validator: Arc<TypeDefinition>,
    /// `EntityValidator<T> : IValidator<T> where T : Entity`
    pub entity_validator: Arc<TypeDefinition>,
    /// `OrderValidator : IValidator<Order>`
    pub order_validator: Arc<TypeDefinition>,
}

impl Model {
    pub fn new() -> Self {
        let entity = TypeDefinition::class("Entity").abstract_class().build();
        let order = TypeDefinition::class("Order")
            .extends(entity.descriptor())
            .default_constructor()
            .build();
        let special_order = TypeDefinition::class("SpecialOrder")
            .extends(order.descriptor())
            .default_constructor()
            .build();
        let customer = TypeDefinition::class("Customer").default_constructor().build();
        let int = TypeDefinition::structure("Int32").build();

        let irepo = TypeDefinition::interface("IRepo").generic(GenericParameter::new("T")).build();
        let repo = TypeDefinition::class("Repo")
            .generic(GenericParameter::new("T").reference_type())
            .implements(irepo.make_generic([t()]))
            .default_constructor()
            .build();
        let cached_repo = TypeDefinition::class("CachedRepo")
            .generic(GenericParameter::new("T"))
            .implements(irepo.make_generic([t()]))
            .default_constructor()
            .build();
        let order_repo = TypeDefinition::class("OrderRepo")
            .implements(irepo.make_generic([order.descriptor()]))
            .default_constructor()
            .build();

        let ivalidator = TypeDefinition::interface("IValidator").generic(GenericParameter::new("T")).build();
        let null_validator = TypeDefinition::class("NullValidator")
            .generic(GenericParameter::new("T"))
            .implements(ivalidator.make_generic([t()]))
            .default_constructor()
            .build();
        let entity_validator = TypeDefinition::class("EntityValidator")
            .generic(GenericParameter::new("T").base_type(entity.descriptor()))
            .implements(ivalidator.make_generic([t()]))
            .default_constructor()
            .build();
        let order_validator = TypeDefinition::class("OrderValidator")
            .implements(ivalidator.make_generic([order.descriptor()]))
            .default_constructor()
            .build();

        Self {
            order,
            customer,
            int,
            entity,
            special_order,
            irepo,
            repo,
            cached_repo,
            order_repo,
            ivalidator,
            null_validator,
            entity_validator,
            order_validator,
        }
    }

    pub fn repo_of(&self, entity: &Arc<TypeDefinition>) -> TypeDescriptor {
        self.irepo.make_generic([entity.descriptor()])
    }

    pub fn validator_of(&self, entity: &Arc<TypeDefinition>) -> TypeDescriptor {
        self.ivalidator.make_generic([entity.descriptor()])
    }
}

/// `List<T> : IEnumerable<T>`
pub fn list_definition() -> Arc<TypeDefinition> {
    TypeDefinition::class("List")
        .generic(GenericParameter::new("T"))
        .implements(enumerable_definition().make_generic([t()]))
        .default_constructor()
        .build()
}

/// A class with one public constructor per entry, each taking the given
/// interfaces as parameters.
pub fn class_with_constructors(name: &str, constructors: &[&[&Arc<TypeDefinition>]]) -> Arc<TypeDefinition> {
    constructors
        .iter()
        .fold(TypeDefinition::class(name), |builder, parameters| {
            builder.constructor(Constructor::public(
                parameters
                    .iter()
                    .enumerate()
                    .map(|(i, ty)| Parameter::new(format!("p{}", i), ty.descriptor())),
            ))
        })
        .build()
}

pub fn interface(name: &str) -> Arc<TypeDefinition> {
    TypeDefinition::interface(name).build()
}

pub fn names<'a>(types: impl IntoIterator<Item = &'a TypeDescriptor>) -> Vec<String> {
    types.into_iter().map(ToString::to_string).collect()
}
