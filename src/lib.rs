//! # ferrous-generics
//!
//! Generic-type resolution engine for dependency-injection containers.
//!
//! Given declarative descriptions of types, ferrous-generics decides which
//! implementations make up a requested collection of services, closing
//! open-generic implementations such as `Repo<T>` against the type
//! arguments a caller asks for, and which constructor of a component the
//! container should invoke.
//!
//! ## Features
//!
//! - **Type unification**: infers generic arguments structurally, from
//!   base types, interfaces and constraint bounds
//! - **Constraint checking**: reference/value type, default constructor,
//!   base type and interface constraints
//! - **Controlled collections**: ordered, deduplicated, append or replace
//! - **Constructor selection**: most resolvable parameters, phase aware
//! - **Thread-safe**: the locked provider is `Clone + Send + Sync`
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_generics::{ServiceCollection, Lifetime, TypeDefinition, TypeDescriptor, GenericParameter};
//!
//! // Describe the types
//! let ivalidator = TypeDefinition::interface("IValidator").generic(GenericParameter::new("T")).build();
//! let order = TypeDefinition::class("Order").build();
//! let data_annotations = TypeDefinition::class("DataAnnotationsValidator")
//!     .generic(GenericParameter::new("T").reference_type())
//!     .implements(ivalidator.make_generic([TypeDescriptor::parameter("T")]))
//!     .default_constructor()
//!     .build();
//! let order_validator = TypeDefinition::class("OrderValidator")
//!     .implements(ivalidator.make_generic([order.descriptor()]))
//!     .default_constructor()
//!     .build();
//!
//! // Register the collection
//! let mut services = ServiceCollection::new();
//! services.add_collection(
//!     ivalidator.open(),
//!     [data_annotations.open(), order_validator.descriptor()],
//!     Lifetime::Transient,
//! ).unwrap();
//!
//! // Lock and resolve
//! let provider = services.build();
//! let validators = provider
//!     .resolve_collection(&ivalidator.make_generic([order.descriptor()]))
//!     .unwrap();
//!
//! let names: Vec<String> = validators.iter().map(|v| v.implementation_type().to_string()).collect();
//! assert_eq!(names, ["DataAnnotationsValidator<Order>", "OrderValidator"]);
//! ```
//!
//! ## Container Phases
//!
//! - **Registering**: a [`ServiceCollection`] accepts registrations
//! - **Locked**: [`ServiceCollection::build`] consumes the collection and
//!   returns a read-only [`ServiceProvider`]
//!
//! ## Logging
//!
//! The crate logs through `tracing`: per-item closing decisions at `trace`,
//! registrations, collection builds and constructor selection at `debug`,
//! rejected registrations at `warn`. Install any `tracing` subscriber to
//! see them, or register a [`ResolutionObserver`].

// Module declarations
pub mod collection;
pub mod config;
pub mod constructor;
pub mod descriptors;
pub mod error;
pub mod generics;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod phase;
pub mod provider;
pub mod registration;
pub mod resolver;
pub mod types;

// Internal modules
mod internal;

// Re-export core types
pub use collection::{
    ControlledItem, RegistrationGroup, ServiceCollection, ServiceCollectionExt, ServiceCollectionModuleExt,
    ServiceModule,
};
pub use config::{ConstructorResolution, ResolverOptions};
pub use constructor::{
    ConstructorCandidate, ConstructorResolutionBehavior, MostResolvableParametersBehavior, SingleConstructorBehavior,
};
pub use descriptors::{CollectionDescriptor, CollectionItemDescriptor};
pub use error::{DiError, DiResult};
pub use generics::{close, ClosingCache, ClosingCacheStats, ClosingFailure, ClosingResult};
pub use key::CollectionKey;
pub use lifetime::Lifetime;
pub use observer::{ResolutionObserver, TracingObserver};
pub use phase::ContainerPhase;
pub use provider::ServiceProvider;
pub use registration::{ensure_singleton, LifestyleRegistrationBuilder, Registration, RegistrationBuilder};
pub use resolver::{CollectionProducer, CollectionResolver, ControlledCollection};
pub use types::{
    Constructor, GenericConstraint, GenericParameter, Parameter, TypeDefinition, TypeDescriptor, TypeKind,
};
