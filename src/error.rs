//! Error types for generic collection resolution and constructor selection.

use thiserror::Error;

/// Dependency injection errors
///
/// Represents the configuration and construction errors surfaced by the
/// registration and resolution surfaces. Every variant carries the display
/// name of the offending type so diagnostics can point at it directly.
///
/// Structural mismatches found while closing an open-generic implementation
/// are *not* errors; they are reported as a
/// [`ClosingFailure`](crate::generics::ClosingFailure) and the candidate is
/// silently excluded.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::DiError;
///
/// let zero = DiError::NoPublicConstructor { implementation: "Repo<Order>".into() };
/// let unresolvable = DiError::NoConstructorWithResolvableParameters {
///     implementation: "Repo<Order>".into(),
/// };
///
/// // The two constructor failures never share a message
/// assert_ne!(zero.to_string(), unresolvable.to_string());
/// assert!(zero.to_string().contains("Repo<Order>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Controlled and uncontrolled collections were mixed for one service type
    #[error(
        "Mixing container-controlled and uncontrolled collection registrations for {service_type} is not supported: {}",
        mixing_reason(.controlled)
    )]
    MixedControlledUncontrolledRegistration {
        /// The service type being registered
        service_type: String,
        /// Whether the rejected call registered controlled items
        controlled: bool,
    },

    /// A non-appending collection registration was repeated while overriding is disabled
    #[error("A collection for {service_type} has already been registered and overriding registrations is disabled")]
    CollectionAlreadyRegistered {
        /// The service type registered twice
        service_type: String,
    },

    /// An implementation type does not implement or extend the service type
    #[error("{implementation} cannot be registered for {service_type} because it does not implement or extend it")]
    ImplementationNotAssignable {
        /// The declared service type
        service_type: String,
        /// The rejected implementation type
        implementation: String,
    },

    /// A generic parameter reference was used where a service type is expected
    #[error("{service_type} is a generic parameter, not a service type")]
    InvalidServiceType {
        /// The rejected service type
        service_type: String,
    },

    /// The implementation has no public constructor at all
    #[error("For the container to be able to create {implementation}, it should contain at least one public constructor")]
    NoPublicConstructor {
        /// The implementation type
        implementation: String,
    },

    /// Public constructors exist but none has only resolvable parameters
    #[error("For the container to be able to create {implementation}, it should contain a public constructor that only contains parameters that can be resolved")]
    NoConstructorWithResolvableParameters {
        /// The implementation type
        implementation: String,
    },

    /// The single-constructor behavior found more than one public constructor
    #[error("For the container to be able to create {implementation}, it should have only one public constructor: it has {count}")]
    MultiplePublicConstructors {
        /// The implementation type
        implementation: String,
        /// Number of public constructors found
        count: usize,
    },

    /// An implementation still containing generic parameters was asked to be constructed
    #[error("{implementation} contains unbound generic parameters and cannot be constructed")]
    OpenGenericImplementation {
        /// The open implementation type
        implementation: String,
    },

    /// A resolution request was made with an open service type
    #[error("{service_type} contains unbound generic parameters; collections can only be resolved for closed service types")]
    RequestedServiceNotClosed {
        /// The open service type
        service_type: String,
    },

    /// Wrong number of type arguments supplied to a generic definition
    #[error("{definition} expects {expected} type argument(s) but {actual} were supplied")]
    GenericArityMismatch {
        /// The generic definition
        definition: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// A hosting boundary expected a singleton registration
    #[error("Service type {service_type} is hosted as a single instance, while {implementation} has been registered with the {lifetime} lifetime. Register {implementation} as Singleton as well")]
    LifestyleMismatchOnSingleton {
        /// The hosted service type
        service_type: String,
        /// The implementation backing the registration
        implementation: String,
        /// The lifetime it was registered with
        lifetime: String,
    },

    /// Invalid resolver configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

fn mixing_reason(controlled: &bool) -> &'static str {
    if *controlled {
        "an uncontrolled collection was already registered, so container-controlled items cannot be added"
    } else {
        "container-controlled items were already registered, so an uncontrolled collection cannot be added"
    }
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{DiResult, DiError};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::Config("unknown key".into()))
/// }
///
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
