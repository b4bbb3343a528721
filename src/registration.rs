//! Registration handles and the builder that produces them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;
use crate::types::TypeDescriptor;

static NEXT_REGISTRATION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a fully built registration.
///
/// Registrations are produced by a [`RegistrationBuilder`] for a closed
/// implementation type. Cloning is cheap and clones compare equal; two
/// registrations built separately never do, even for the same type.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{Registration, Lifetime, TypeDefinition};
///
/// let order_handler = TypeDefinition::class("OrderHandler").build();
/// let a = Registration::new(order_handler.descriptor(), Lifetime::Singleton);
/// let b = Registration::new(order_handler.descriptor(), Lifetime::Singleton);
///
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
#[derive(Clone)]
pub struct Registration {
    inner: Arc<RegistrationInner>,
}

struct RegistrationInner {
    id: u64,
    implementation_type: TypeDescriptor,
    lifetime: Lifetime,
}

impl Registration {
    /// Creates a new registration with a fresh identity
    pub fn new(implementation_type: TypeDescriptor, lifetime: Lifetime) -> Self {
        Self {
            inner: Arc::new(RegistrationInner {
                id: NEXT_REGISTRATION_ID.fetch_add(1, Ordering::Relaxed),
                implementation_type,
                lifetime,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn implementation_type(&self) -> &TypeDescriptor {
        &self.inner.implementation_type
    }

    pub fn lifetime(&self) -> Lifetime {
        self.inner.lifetime
    }
}

impl PartialEq for Registration {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Registration {}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.inner.id)
            .field("implementation_type", &self.inner.implementation_type)
            .field("lifetime", &self.inner.lifetime)
            .finish()
    }
}

/// Wraps a closed implementation type into a [`Registration`].
///
/// This is the seam to the lifetime-management subsystem; the resolver only
/// calls it after an implementation has been closed successfully.
pub trait RegistrationBuilder: Send + Sync {
    fn build(&self, implementation_type: &TypeDescriptor, lifetime: Lifetime) -> Registration;
}

/// Default builder: records the implementation and its declared lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifestyleRegistrationBuilder;

impl RegistrationBuilder for LifestyleRegistrationBuilder {
    fn build(&self, implementation_type: &TypeDescriptor, lifetime: Lifetime) -> Registration {
        Registration::new(implementation_type.clone(), lifetime)
    }
}

/// Checks a registration that a hosting boundary will hold on to forever.
///
/// Hosts that keep a single service instance for their whole lifetime need
/// that instance to be registered as a singleton; any other lifetime is
/// reported as [`DiError::LifestyleMismatchOnSingleton`].
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{ensure_singleton, Registration, Lifetime, TypeDefinition};
///
/// let service = TypeDefinition::interface("IOrderService").build();
/// let implementation = TypeDefinition::class("OrderService").build();
///
/// let scoped = Registration::new(implementation.descriptor(), Lifetime::Scoped);
/// assert!(ensure_singleton(&service.descriptor(), &scoped).is_err());
///
/// let singleton = Registration::new(implementation.descriptor(), Lifetime::Singleton);
/// assert!(ensure_singleton(&service.descriptor(), &singleton).is_ok());
/// ```
pub fn ensure_singleton(service_type: &TypeDescriptor, registration: &Registration) -> DiResult<()> {
    if registration.lifetime() == Lifetime::Singleton {
        return Ok(());
    }

    tracing::warn!(
        service = %service_type,
        implementation = %registration.implementation_type(),
        lifetime = %registration.lifetime(),
        "single-instance host requires a singleton registration"
    );

    Err(DiError::LifestyleMismatchOnSingleton {
        service_type: service_type.to_string(),
        implementation: registration.implementation_type().to_string(),
        lifetime: registration.lifetime().to_string(),
    })
}
