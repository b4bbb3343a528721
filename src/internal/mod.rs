//! Internal implementation details.

pub(crate) mod lock;

pub(crate) use lock::CacheLock;

/// Hash map used for lookup tables that are never iterated in order.
#[cfg(feature = "ahash")]
pub(crate) type FastMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type FastMap<K, V> = std::collections::HashMap<K, V>;
