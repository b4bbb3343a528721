//! Service module system for modular registration.
//!
//! This module provides traits for organizing collection registrations
//! into reusable modules.

use crate::collection::ServiceCollection;
use crate::error::DiResult;

/// A module that registers collections with a ServiceCollection.
///
/// Each module groups the registrations of one feature area; a failing
/// registration stops the module and is returned to the caller.
///
/// # Example
///
/// ```rust
/// use ferrous_generics::{
///     DiResult, GenericParameter, Lifetime, ServiceCollection, ServiceCollectionExt, ServiceModule,
///     TypeDefinition, TypeDescriptor,
/// };
///
/// struct ValidationModule;
///
/// impl ServiceModule for ValidationModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         let ivalidator = TypeDefinition::interface("IValidator").generic(GenericParameter::new("T")).build();
///         let null_validator = TypeDefinition::class("NullValidator")
///             .generic(GenericParameter::new("T"))
///             .implements(ivalidator.make_generic([TypeDescriptor::parameter("T")]))
///             .build();
///         services.add_collection(ivalidator.open(), [null_validator.open()], Lifetime::Singleton)?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let provider = ServiceCollection::new().add_module(ValidationModule)?.build();
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Register this module's collections with the ServiceCollection.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Extension trait for chaining modules by value.
pub trait ServiceCollectionExt {
    /// Add a module to the service collection, consuming and returning it.
    fn add_module<M: ServiceModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(mut self, module: M) -> DiResult<Self> {
        module.register_services(&mut self)?;
        Ok(self)
    }
}

/// Extension trait for adding modules in place, matching the `&mut Self`
/// registration methods.
pub trait ServiceCollectionModuleExt {
    /// Add a module to the service collection in-place.
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl ServiceCollectionModuleExt for ServiceCollection {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
