use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

/// Default epoch: Wednesday, January 1, 2020 00:00:00 UTC.
///
/// The epoch is subtracted from wall-clock readings before bit-packing.
/// With 53 timestamp bits this leaves roughly 285,616 years of headroom.
/// It must never change once IDs have been issued: mixing epochs breaks
/// relative ordering between old and new IDs.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_577_836_800_000);

/// A source of timestamps expressed as milliseconds since a configured
/// epoch.
///
/// Abstracting the clock lets tests inject deterministic or adversarial
/// (backward-jumping) time sequences to exercise the skew policy.
///
/// # Example
///
/// ```
/// use mintid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

/// A time source that never moves backward.
///
/// The clock captures the wall-clock offset from the epoch once, at
/// construction, then measures elapsed time with a monotonic timer. A
/// background thread updates a shared counter once per millisecond, so
/// reads on the hot path are a single atomic load and external clock
/// adjustments (NTP steps, manual changes) cannot regress the reading.
///
/// The ticker thread exits on its own once the last clone of the clock is
/// dropped.
#[derive(Clone)]
pub struct MonotonicClock {
    ticks: Arc<AtomicU64>,
    epoch_offset: u64,
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    ///
    /// Panics if the system time is earlier than the default epoch.
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using `epoch` as its origin (t = 0),
    /// given as a [`Duration`] since 1970-01-01 UTC.
    ///
    /// # Panics
    ///
    /// Panics if the current system time is earlier than `epoch`.
    pub fn with_epoch(epoch: Duration) -> Self {
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before UNIX_EPOCH");
        let epoch_offset = system_now
            .checked_sub(epoch)
            .expect("system clock before configured epoch")
            .as_millis() as u64;

        let ticks = Arc::new(AtomicU64::new(0));
        let weak = Arc::downgrade(&ticks);
        thread::spawn(move || {
            let start = Instant::now();
            let mut next_tick = 0u64;

            while let Some(ticks) = weak.upgrade() {
                let target = start + Duration::from_millis(next_tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                // Recompute after waking; sleeps overshoot.
                let elapsed = start.elapsed().as_millis() as u64;
                ticks.store(elapsed, Ordering::Release);
                next_tick = elapsed + 1;
            }
        });

        Self { ticks, epoch_offset }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.ticks.load(Ordering::Acquire)
    }
}

/// A time source that reads the system clock directly.
///
/// Unlike [`MonotonicClock`], readings follow whatever the operating
/// system reports and therefore *can* move backward under clock
/// adjustment. Pair it with a [`SkewPolicy`] that matches your ordering
/// requirements.
///
/// If the system clock reads earlier than the configured epoch the offset
/// saturates to zero rather than wrapping.
///
/// [`SkewPolicy`]: crate::SkewPolicy
#[derive(Clone)]
pub struct WallClock {
    epoch_millis: u64,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using `epoch` as its origin (t = 0), given
    /// as a [`Duration`] since 1970-01-01 UTC.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: epoch.as_millis() as u64,
        }
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before UNIX_EPOCH")
            .as_millis() as u64;
        now.saturating_sub(self.epoch_millis)
    }
}
