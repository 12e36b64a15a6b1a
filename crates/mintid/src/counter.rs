use std::collections::HashMap;

#[cfg(feature = "parking-lot")]
use parking_lot::RwLock;
use portable_atomic::{AtomicU64, Ordering};
#[cfg(not(feature = "parking-lot"))]
use std::sync::RwLock;

use crate::error::{Error, Result};

/// A per-namespace atomic counter backend.
///
/// Each registered namespace owns exactly one counter, initialized to zero
/// and advanced by exactly 1 on every allocation. The store hands back the
/// *prior*, pre-modulo value; the caller applies the modulo-1024 reduction
/// at read time, so the underlying value strictly increases across calls
/// and same-millisecond allocations stay ordered.
///
/// The original design backs this with a relational sequence; any atomic
/// "fetch and advance" primitive works, which is why the backend sits
/// behind this trait. Implementations must guarantee that two concurrent
/// `advance` calls for the same namespace never observe the same prior
/// value.
pub trait CounterStore {
    /// Creates a fresh, independent, zero-initialized counter for
    /// `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceExists`] if the namespace already owns a
    /// counter.
    fn register(&self, namespace: &str) -> Result<()>;

    /// Atomically advances the counter owned by `namespace` and returns
    /// its prior value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredNamespace`] if no counter exists for
    /// `namespace`, or [`Error::CounterExhausted`] for backends whose
    /// storage can genuinely run out.
    fn advance(&self, namespace: &str) -> Result<u64>;
}

#[cfg(feature = "cache-padded")]
type Counter = crossbeam_utils::CachePadded<AtomicU64>;
#[cfg(not(feature = "cache-padded"))]
type Counter = AtomicU64;

fn new_counter() -> Counter {
    #[cfg(feature = "cache-padded")]
    {
        crossbeam_utils::CachePadded::new(AtomicU64::new(0))
    }
    #[cfg(not(feature = "cache-padded"))]
    {
        AtomicU64::new(0)
    }
}

/// An in-process [`CounterStore`] backed by one [`AtomicU64`] per
/// namespace.
///
/// Registration takes a write lock on the registry map; allocation takes
/// only a read lock plus a relaxed `fetch_add`, so namespaces never
/// contend with each other on the hot path. With the `cache-padded`
/// feature each counter is padded to its own cache line to avoid false
/// sharing between hot namespaces.
///
/// The pre-modulo counter is 64 bits wide and wraps only at `u64::MAX`,
/// which is unreachable in practice; this store never returns
/// [`Error::CounterExhausted`].
///
/// # Example
///
/// ```
/// use mintid::{AtomicCounterStore, CounterStore};
///
/// let store = AtomicCounterStore::new();
/// store.register("orders")?;
/// assert_eq!(store.advance("orders")?, 0);
/// assert_eq!(store.advance("orders")?, 1);
/// # Ok::<(), mintid::Error>(())
/// ```
#[derive(Default)]
pub struct AtomicCounterStore {
    counters: RwLock<HashMap<Box<str>, Counter>>,
}

impl AtomicCounterStore {
    /// Creates an empty store with no registered namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `namespace` owns a counter.
    pub fn is_registered(&self, namespace: &str) -> Result<bool> {
        let counters = {
            #[cfg(feature = "parking-lot")]
            {
                self.counters.read()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.counters.read()?
            }
        };
        Ok(counters.contains_key(namespace))
    }
}

impl CounterStore for AtomicCounterStore {
    fn register(&self, namespace: &str) -> Result<()> {
        let mut counters = {
            #[cfg(feature = "parking-lot")]
            {
                self.counters.write()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.counters.write()?
            }
        };
        if counters.contains_key(namespace) {
            return Err(Error::NamespaceExists(namespace.into()));
        }
        counters.insert(namespace.into(), new_counter());
        Ok(())
    }

    fn advance(&self, namespace: &str) -> Result<u64> {
        let counters = {
            #[cfg(feature = "parking-lot")]
            {
                self.counters.read()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.counters.read()?
            }
        };
        let counter = counters
            .get(namespace)
            .ok_or_else(|| Error::UnregisteredNamespace(namespace.into()))?;
        Ok(counter.fetch_add(1, Ordering::Relaxed))
    }
}
