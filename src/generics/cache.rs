//! Memoization of closing results.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::internal::{CacheLock, FastMap};
use crate::types::TypeDescriptor;
use super::{close, ClosingResult};

type ClosingKey = (TypeDescriptor, TypeDescriptor);

/// Closing results memoized per `(open implementation, requested service)` pair.
///
/// Purely additive: a cached result is the value [`close`] returns for the
/// same pair, so enabling the cache never changes what is resolved or in
/// which order.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{ClosingCache, TypeDefinition, TypeDescriptor, GenericParameter};
///
/// let iservice = TypeDefinition::interface("IService").generic(GenericParameter::new("T")).build();
/// let service = TypeDefinition::class("Service")
///     .generic(GenericParameter::new("T"))
///     .implements(iservice.make_generic([TypeDescriptor::parameter("T")]))
///     .build();
/// let order = TypeDefinition::class("Order").build();
/// let request = iservice.make_generic([order.descriptor()]);
///
/// let cache = ClosingCache::new();
/// let first = cache.close(&service.open(), &request);
/// let second = cache.close(&service.open(), &request);
///
/// assert_eq!(first, second);
/// assert_eq!(cache.stats().hits, 1);
/// assert_eq!(cache.stats().misses, 1);
/// ```
#[derive(Debug, Default)]
pub struct ClosingCache {
    entries: CacheLock<FastMap<ClosingKey, ClosingResult>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters of a [`ClosingCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosingCacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl ClosingCacheStats {
    /// Calculate hit ratio as a percentage
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl ClosingCache {
    pub fn new() -> Self {
        Self {
            entries: CacheLock::new(FastMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the memoized result for the pair, computing it on first use.
    pub fn close(&self, open_implementation: &TypeDescriptor, requested_service: &TypeDescriptor) -> ClosingResult {
        let key = (open_implementation.clone(), requested_service.clone());

        if let Some(result) = self.entries.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return result.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = close(open_implementation, requested_service);
        self.entries.write().entry(key).or_insert_with(|| result.clone());
        result
    }

    pub fn stats(&self) -> ClosingCacheStats {
        ClosingCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of memoized pairs.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
