
use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    counter::CounterStore,
    error::{Error, Result},
    id::MintId,
    time::TimeSource,
};

/// Policy applied when the clock is observed to move backward relative to
/// the minter's high-water mark.
///
/// A [`MonotonicClock`] never regresses, so the policy only matters for
/// wall-clock sources subject to NTP steps or manual adjustment. Clock
/// regression is a property of the shared clock rather than of any one
/// namespace, so a single high-water mark per minter detects it.
///
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkewPolicy {
    /// Reuse the high-water-mark timestamp until the clock catches up.
    ///
    /// The counter keeps advancing, so sort order is preserved; a held
    /// millisecond can wrap past 1024 allocations, which is tolerated
    /// exactly as in normal operation.
    #[default]
    HoldLast,

    /// Fail the allocation with [`Error::ClockSkew`].
    Reject,

    /// Accept the regressed reading. The new ID may sort below IDs already
    /// issued for the same namespace.
    Tolerate,
}

/// Mints 63-bit, time-sortable identifiers, one independent counter per
/// namespace.
///
/// An ID is composed as `(timestamp_offset << 10) | (counter % 1024)`,
/// where the timestamp offset is milliseconds since the epoch configured
/// on the [`TimeSource`]. The counter backend and the clock are both
/// capability traits, so tests can swap in deterministic stores and
/// adversarial clocks.
///
/// Minting does not guarantee global uniqueness beyond 1024 allocations
/// per millisecond per namespace: past that the low 10 bits wrap and the
/// ID repeats an earlier same-millisecond pattern. Callers that need
/// strict uniqueness must enforce it on the storage holding the ID (for
/// example a unique index).
///
/// # Example
///
/// ```
/// use mintid::{AtomicCounterStore, Minter, MonotonicClock};
///
/// let minter = Minter::new(AtomicCounterStore::new(), MonotonicClock::default());
/// minter.register_namespace("orders")?;
///
/// let first = minter.try_allocate("orders")?;
/// let second = minter.try_allocate("orders")?;
/// assert!(second > first);
/// # Ok::<(), mintid::Error>(())
/// ```
pub struct Minter<S, T>
where
    S: CounterStore,
    T: TimeSource,
{
    store: S,
    time: T,
    policy: SkewPolicy,
    high_water: AtomicU64,
}

impl<S, T> Minter<S, T>
where
    S: CounterStore,
    T: TimeSource,
{
    /// Creates a minter with the default [`SkewPolicy::HoldLast`].
    pub fn new(store: S, time: T) -> Self {
        Self::with_policy(store, time, SkewPolicy::default())
    }

    /// Creates a minter with an explicit clock-skew policy.
    pub fn with_policy(store: S, time: T, policy: SkewPolicy) -> Self {
        Self {
            store,
            time,
            policy,
            high_water: AtomicU64::new(0),
        }
    }

    /// Returns the counter store backing this minter.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a fresh, independent, zero-initialized counter for
    /// `namespace`.
    ///
    /// Call exactly once per logical entity type before the first
    /// allocation. Namespaces must never be shared between entity types:
    /// a shared counter lets identifiers from different streams collide.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceExists`] if the namespace is already
    /// registered. A fresh counter for an existing namespace could reuse
    /// sequence values within the current millisecond, so this is treated
    /// as a programmer error rather than a no-op.
    pub fn register_namespace(&self, namespace: &str) -> Result<()> {
        self.store.register(namespace)
    }

    /// Mints the next identifier for `namespace`.
    ///
    /// The namespace's counter is advanced first, then the clock is read,
    /// so two concurrent calls never observe the same sequence value for
    /// the same millisecond. For a fixed namespace, an ID minted at least
    /// one millisecond after another sorts strictly greater, and IDs
    /// minted within the same millisecond sort in allocation order until
    /// the counter wraps at 1024.
    ///
    /// # Errors
    ///
    /// - [`Error::UnregisteredNamespace`] if `namespace` has no counter.
    /// - [`Error::ClockSkew`] under [`SkewPolicy::Reject`] when the clock
    ///   reads below the minter's high-water mark.
    /// - Whatever the [`CounterStore`] backend surfaces.
    ///
    /// # Example
    ///
    /// ```
    /// use mintid::{AtomicCounterStore, MintId, Minter, MonotonicClock};
    ///
    /// let minter = Minter::new(AtomicCounterStore::new(), MonotonicClock::default());
    /// minter.register_namespace("orders")?;
    ///
    /// let id = minter.try_allocate("orders")?;
    /// assert_eq!(id.sequence(), 0);
    /// assert_eq!(id, MintId::from_parts(id.timestamp_offset(), id.sequence()));
    /// # Ok::<(), mintid::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_allocate(&self, namespace: &str) -> Result<MintId> {
        let prior = self.store.advance(namespace)?;
        let seq = prior & MintId::SEQUENCE_MASK;

        let observed = self.time.current_millis();
        let last = self.high_water.fetch_max(observed, Ordering::AcqRel);

        let offset = match self.policy {
            SkewPolicy::HoldLast => observed.max(last),
            SkewPolicy::Tolerate => observed,
            SkewPolicy::Reject if observed < last => {
                return Err(Error::ClockSkew {
                    last_millis: last,
                    now_millis: observed,
                });
            }
            SkewPolicy::Reject => observed,
        };
        debug_assert!(
            offset <= MintId::max_timestamp(),
            "timestamp offset overflows 53 bits"
        );

        Ok(MintId::from_parts(offset, seq))
    }

    /// Mints the next identifier for `namespace`, panicking on failure.
    ///
    /// Convenience for callers that registered the namespace up front and
    /// use a store that cannot fail. Prefer [`Self::try_allocate`] when
    /// the error cases are reachable.
    ///
    /// # Panics
    ///
    /// Panics on any error [`Self::try_allocate`] would return.
    pub fn allocate(&self, namespace: &str) -> MintId {
        match self.try_allocate(namespace) {
            Ok(id) => id,
            Err(e) => panic!("failed to mint an ID for `{namespace}`: {e}"),
        }
    }
}
