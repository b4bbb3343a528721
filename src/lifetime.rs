//! Service lifetime definitions.

use std::fmt;

/// Declared lifetime of a collection item.
///
/// The lifetime is configuration that travels with a
/// [`ControlledItem`](crate::ControlledItem): when an open-generic item is
/// closed for a concrete request, the fresh closed item keeps the lifetime
/// that was declared for the open one. Caching policy itself belongs to the
/// lifetime-management collaborator that turns closed types into
/// [`Registration`](crate::Registration)s.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::Lifetime;
///
/// assert_eq!(Lifetime::default(), Lifetime::Transient);
/// assert_eq!(Lifetime::Singleton.to_string(), "Singleton");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Single instance per container
    Singleton,
    /// Single instance per scope
    Scoped,
    /// New instance per resolution
    #[default]
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Singleton => "Singleton",
            Lifetime::Scoped => "Scoped",
            Lifetime::Transient => "Transient",
        };
        f.write_str(name)
    }
}
