#![no_main]

use ferrous_generics::{
    ControlledItem, DiError, GenericParameter, Lifetime, Registration, ResolverOptions, ServiceCollection,
    TypeDefinition, TypeDescriptor,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let entity = TypeDefinition::class("Entity").abstract_class().build();
    let order = TypeDefinition::class("Order").extends(entity.descriptor()).build();
    let int = TypeDefinition::structure("Int32").build();
    let ihandler = TypeDefinition::interface("IHandler").generic(GenericParameter::new("T")).build();
    let iother = TypeDefinition::interface("IOther").generic(GenericParameter::new("T")).build();
    let t = TypeDescriptor::parameter("T");

    let candidates = [
        TypeDefinition::class("Handler")
            .generic(GenericParameter::new("T"))
            .implements(ihandler.make_generic([t.clone()]))
            .build()
            .open(),
        TypeDefinition::class("EntityHandler")
            .generic(GenericParameter::new("T").base_type(entity.descriptor()))
            .implements(ihandler.make_generic([t.clone()]))
            .build()
            .open(),
        TypeDefinition::class("OrderHandler")
            .implements(ihandler.make_generic([order.descriptor()]))
            .build()
            .descriptor(),
        TypeDefinition::class("OtherHandler")
            .generic(GenericParameter::new("T"))
            .implements(iother.make_generic([t.clone()]))
            .build()
            .open(),
    ];
    let service_types = [ihandler.open(), ihandler.make_generic([order.descriptor()]), iother.open()];
    let lifetimes = [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient];

    let mut services = ServiceCollection::with_options(ResolverOptions {
        allow_overriding_registrations: data[0] % 2 == 0,
        ..ResolverOptions::default()
    });

    for chunk in data[1..].chunks(3) {
        let [op, a, b] = match chunk {
            [op, a, b] => [*op, *a, *b],
            _ => break,
        };
        let service = service_types[a as usize % service_types.len()].clone();
        let implementation = candidates[b as usize % candidates.len()].clone();
        let lifetime = lifetimes[op as usize % lifetimes.len()];

        let result = match op % 4 {
            0 => services.add_collection(service, [implementation], lifetime).map(|_| ()),
            1 => services.append_to_collection(service, implementation, lifetime).map(|_| ()),
            // built registrations always carry a closed implementation
            2 => services
                .append_registration(service, Registration::new(candidates[2].clone(), lifetime))
                .map(|_| ()),
            _ => services
                .register_controlled_items(service, [ControlledItem::from_type(implementation, lifetime)], true)
                .map(|_| ()),
        };

        match result {
            Ok(())
            | Err(DiError::ImplementationNotAssignable { .. })
            | Err(DiError::CollectionAlreadyRegistered { .. }) => {}
            Err(other) => panic!("unexpected registration error: {}", other),
        }
    }

    let provider = services.build();
    for entity_type in [order.descriptor(), int.descriptor(), entity.descriptor()] {
        for service in [&ihandler, &iother] {
            let request = service.make_generic([entity_type.clone()]);
            let items = provider.resolve_collection(&request).unwrap();

            for (index, item) in items.iter().enumerate() {
                assert!(!item.is_open());
                assert!(item.implementation_type().is_assignable_to(&request));
                assert!(!items[..index].contains(item));
            }
        }
    }
});
