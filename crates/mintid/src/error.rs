/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `mintid` can produce.
///
/// Every error is returned synchronously from the call that hit it; there
/// is no background recovery. [`Error::ClockSkew`] only surfaces under
/// [`SkewPolicy::Reject`], and [`Error::CounterExhausted`] is reserved for
/// [`CounterStore`] backends whose underlying counter can genuinely run
/// out — the in-process [`AtomicCounterStore`] never returns it.
///
/// [`SkewPolicy::Reject`]: crate::SkewPolicy::Reject
/// [`CounterStore`]: crate::CounterStore
/// [`AtomicCounterStore`]: crate::AtomicCounterStore
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Allocation was requested for a namespace with no registered counter.
    #[error("namespace `{0}` has no registered counter")]
    UnregisteredNamespace(Box<str>),

    /// The namespace already owns a counter. Registering twice is a
    /// programmer error: a fresh counter would collide with IDs already
    /// issued within the same millisecond.
    #[error("namespace `{0}` is already registered")]
    NamespaceExists(Box<str>),

    /// The clock was observed to move backward relative to the minter's
    /// high-water mark.
    #[error("clock moved backward: last seen {last_millis} ms, observed {now_millis} ms")]
    ClockSkew {
        /// The highest timestamp offset observed so far, in milliseconds.
        last_millis: u64,
        /// The regressed reading, in milliseconds.
        now_millis: u64,
    },

    /// The counter storage backing the namespace is exhausted.
    #[error("counter storage for namespace `{0}` is exhausted")]
    CounterExhausted(Box<str>),

    /// A shared lock was poisoned by a thread that panicked while holding
    /// it. Only reachable without the `parking-lot` feature.
    #[error("a shared lock was poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
impl<G> From<std::sync::PoisonError<G>> for Error {
    fn from(_: std::sync::PoisonError<G>) -> Self {
        Self::LockPoisoned
    }
}
