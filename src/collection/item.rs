//! Items contributed to a container-controlled collection.

use crate::lifetime::Lifetime;
use crate::registration::Registration;
use crate::types::TypeDescriptor;

/// One contribution to a registered collection.
///
/// Either an implementation type still waiting to be turned into a
/// registration (possibly open-generic, pending closing) or a registration
/// that has already been built. The two never coexist in one item.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{ControlledItem, Lifetime, Registration, TypeDefinition, GenericParameter};
///
/// let validator = TypeDefinition::class("NullValidator").generic(GenericParameter::new("T")).build();
/// let item = ControlledItem::from_type(validator.open(), Lifetime::Singleton);
/// assert!(item.is_open());
/// assert!(item.registration().is_none());
///
/// let logger = TypeDefinition::class("NullLogger").build();
/// let built = ControlledItem::from_registration(Registration::new(logger.descriptor(), Lifetime::Singleton));
/// assert!(!built.is_open());
/// assert_eq!(built.implementation_type().to_string(), "NullLogger");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlledItem {
    /// An implementation type plus the lifetime declared for it
    ImplementationType {
        implementation: TypeDescriptor,
        lifetime: Lifetime,
    },
    /// A registration that has already been built
    BuiltRegistration(Registration),
}

impl ControlledItem {
    pub fn from_type(implementation: TypeDescriptor, lifetime: Lifetime) -> Self {
        ControlledItem::ImplementationType { implementation, lifetime }
    }

    pub fn from_registration(registration: Registration) -> Self {
        ControlledItem::BuiltRegistration(registration)
    }

    pub fn implementation_type(&self) -> &TypeDescriptor {
        match self {
            ControlledItem::ImplementationType { implementation, .. } => implementation,
            ControlledItem::BuiltRegistration(registration) => registration.implementation_type(),
        }
    }

    pub fn lifetime(&self) -> Lifetime {
        match self {
            ControlledItem::ImplementationType { lifetime, .. } => *lifetime,
            ControlledItem::BuiltRegistration(registration) => registration.lifetime(),
        }
    }

    pub fn registration(&self) -> Option<&Registration> {
        match self {
            ControlledItem::BuiltRegistration(registration) => Some(registration),
            ControlledItem::ImplementationType { .. } => None,
        }
    }

    /// True when the implementation type still contains generic parameters.
    pub fn is_open(&self) -> bool {
        self.implementation_type().contains_generic_parameters()
    }
}
