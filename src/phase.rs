//! Container lifecycle phases.

/// Lifecycle phase passed explicitly to every phase-sensitive operation.
///
/// A [`ServiceCollection`](crate::ServiceCollection) is always
/// `Registering`; building it into a [`ServiceProvider`](crate::ServiceProvider)
/// is the one transition to `Locked`, and nothing transitions back.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{ContainerPhase, ServiceCollection};
///
/// let services = ServiceCollection::new();
/// assert_eq!(services.phase(), ContainerPhase::Registering);
///
/// let provider = services.build();
/// assert_eq!(provider.phase(), ContainerPhase::Locked);
/// assert!(provider.phase().is_locked());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerPhase {
    /// Registrations are still being made; the dependency graph may be incomplete
    Registering,
    /// No further registrations are accepted
    Locked,
}

impl ContainerPhase {
    pub fn is_locked(self) -> bool {
        self == ContainerPhase::Locked
    }
}
