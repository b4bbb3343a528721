#![no_main]

use ferrous_generics::{close, ClosingCache, GenericParameter, TypeDefinition, TypeDescriptor};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Universe {
    concrete: Vec<Arc<TypeDefinition>>,
    ihandler: Arc<TypeDefinition>,
    ipair: Arc<TypeDefinition>,
    wrapper: Arc<TypeDefinition>,
    implementations: Vec<TypeDescriptor>,
}

fn t(name: &str) -> TypeDescriptor {
    TypeDescriptor::parameter(name)
}

fn universe() -> Universe {
    let entity = TypeDefinition::class("Entity").abstract_class().build();
    let order = TypeDefinition::class("Order").extends(entity.descriptor()).default_constructor().build();
    let customer = TypeDefinition::class("Customer").build();
    let int = TypeDefinition::structure("Int32").build();

    let ihandler = TypeDefinition::interface("IHandler").generic(GenericParameter::new("T")).build();
    let ipair = TypeDefinition::interface("IPair")
        .generic(GenericParameter::new("A"))
        .generic(GenericParameter::new("B"))
        .build();
    let wrapper = TypeDefinition::class("Wrapper").generic(GenericParameter::new("T")).build();

    let implementations = vec![
        TypeDefinition::class("Handler")
            .generic(GenericParameter::new("T"))
            .implements(ihandler.make_generic([t("T")]))
            .build()
            .open(),
        TypeDefinition::class("EntityHandler")
            .generic(GenericParameter::new("T").base_type(entity.descriptor()))
            .implements(ihandler.make_generic([t("T")]))
            .build()
            .open(),
        TypeDefinition::class("ValueHandler")
            .generic(GenericParameter::new("T").value_type())
            .implements(ihandler.make_generic([t("T")]))
            .build()
            .open(),
        TypeDefinition::class("NewHandler")
            .generic(GenericParameter::new("T").default_constructor())
            .implements(ihandler.make_generic([t("T")]))
            .build()
            .open(),
        TypeDefinition::class("WrappedHandler")
            .generic(GenericParameter::new("T"))
            .implements(ihandler.make_generic([wrapper.make_generic([t("T")])]))
            .build()
            .open(),
        TypeDefinition::class("SamePair")
            .generic(GenericParameter::new("T"))
            .implements(ipair.make_generic([t("T"), t("T")]))
            .build()
            .open(),
        TypeDefinition::class("SwappedPair")
            .generic(GenericParameter::new("X"))
            .generic(GenericParameter::new("Y"))
            .implements(ipair.make_generic([t("Y"), t("X")]))
            .build()
            .open(),
    ];

    Universe {
        concrete: vec![entity, order, customer, int],
        ihandler,
        ipair,
        wrapper,
        implementations,
    }
}

/// Builds a closed type from the input bytes, nesting at most `depth` wrappers.
fn closed_type(u: &Universe, data: &mut impl Iterator<Item = u8>, depth: usize) -> TypeDescriptor {
    let byte = data.next().unwrap_or(0);
    if depth > 0 && byte % 5 == 4 {
        return u.wrapper.make_generic([closed_type(u, data, depth - 1)]);
    }
    u.concrete[byte as usize % u.concrete.len()].descriptor()
}

fuzz_target!(|data: &[u8]| {
    let u = universe();
    let cache = ClosingCache::new();
    let mut bytes = data.iter().copied();

    while let Some(selector) = bytes.next() {
        let requested = if selector % 2 == 0 {
            u.ihandler.make_generic([closed_type(&u, &mut bytes, 3)])
        } else {
            let first = closed_type(&u, &mut bytes, 2);
            let second = closed_type(&u, &mut bytes, 2);
            u.ipair.make_generic([first, second])
        };
        let implementation = &u.implementations[(selector as usize / 2) % u.implementations.len()];

        let direct = close(implementation, &requested);
        let cached = cache.close(implementation, &requested);
        assert_eq!(direct, cached);

        if let Some(closed) = direct.closed_implementation {
            assert!(!closed.contains_generic_parameters());
            assert!(closed.is_assignable_to(&requested));
            assert_eq!(close(&closed, &requested).closed_implementation, Some(closed));
        }
    }
});
