//! Read/write lock used by the additive resolution caches.

#[cfg(feature = "parking-lot")]
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(not(feature = "parking-lot"))]
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lock over cached data that can always be rebuilt.
///
/// Poisoning is ignored: every entry is derived from immutable registration
/// state and can be recomputed.
#[derive(Debug, Default)]
pub(crate) struct CacheLock<T> {
    inner: RwLock<T>,
}

impl<T> CacheLock<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    #[cfg(feature = "parking-lot")]
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    #[cfg(not(feature = "parking-lot"))]
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(feature = "parking-lot")]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }

    #[cfg(not(feature = "parking-lot"))]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
