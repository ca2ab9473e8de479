use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, MAX_SEQUENCE, MAX_WORKER_ID, Result, SnowflakeId, TimeSource, WorkerIdProvider,
    generator::{Mutex, SnowflakeGenerator},
};

/// Mutable generator state. Both fields describe the most recently issued ID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
    pub(crate) last_timestamp: u64,
    pub(crate) sequence: u64,
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// This generator wraps its state in an [`Arc<Mutex<_>>`], allowing safe
/// shared use across threads and tasks. Cloning the generator yields another
/// handle onto the same state.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Strictly increasing IDs per generator
/// - ✅ Clock regression reported, never absorbed
///
/// When the 4096 sequence values of a millisecond are used up, the call spins
/// on the time source until the next millisecond **while holding the lock**,
/// so no other caller can claim a timestamp/sequence pair in the meantime.
///
/// # Example
/// ```
/// use snowgen::{LockSnowflakeGenerator, SystemClock};
///
/// let generator = LockSnowflakeGenerator::new(7, SystemClock::default())?;
/// let a = generator.next_id()?;
/// let b = generator.next_id()?;
/// assert!(a < b);
/// assert_eq!(a.worker_id(), 7);
/// # Ok::<(), snowgen::Error>(())
/// ```
pub struct LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    pub(crate) state: Arc<crossbeam_utils::CachePadded<Mutex<State>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Arc<Mutex<State>>,
    pub(crate) worker_id: u32,
    pub(crate) time: T,
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`LockSnowflakeGenerator`] with zeroed timestamp and
    /// sequence state.
    ///
    /// # Parameters
    ///
    /// - `worker_id`: identifies this node; encoded into every generated ID.
    /// - `time`: a [`TimeSource`] (e.g., [`SystemClock`]) that determines the
    ///   epoch and how timestamps are read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if `worker_id > MAX_WORKER_ID`.
    ///
    /// [`SystemClock`]: crate::SystemClock
    pub fn new(worker_id: u32, time: T) -> Result<Self> {
        if worker_id > MAX_WORKER_ID {
            return Err(Error::InvalidWorkerId {
                worker_id,
                max: MAX_WORKER_ID,
            });
        }

        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(
                State::default(),
            ))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(State::default())),
            worker_id,
            time,
        })
    }

    /// Creates a new generator whose worker id comes from `provider`.
    ///
    /// ```
    /// use snowgen::{FixedWorkerId, LockSnowflakeGenerator, SystemClock};
    ///
    /// let generator = LockSnowflakeGenerator::from_provider(&FixedWorkerId(3), SystemClock::default())?;
    /// assert_eq!(generator.worker_id(), 3);
    /// # Ok::<(), snowgen::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if the provider hands out an
    /// out-of-range id.
    pub fn from_provider<P>(provider: &P, time: T) -> Result<Self>
    where
        P: WorkerIdProvider + ?Sized,
    {
        Self::new(provider.worker_id(), time)
    }

    pub fn worker_id(&self) -> u32 {
        self.worker_id
    }

    /// Generates the next ID.
    ///
    /// Equal readings of the clock bump the sequence; any forward movement
    /// resets it to zero. A reading behind the last issued timestamp fails
    /// without touching state, so a later call behaves as if this one never
    /// happened.
    ///
    /// # Errors
    /// - [`Error::ClockRegression`] if the clock moved backwards.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   lock (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(worker_id = self.worker_id)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let mut now = self.time.current_millis();
        let last = state.last_timestamp;

        if now < last {
            return Err(Self::cold_clock_behind(now, last));
        }

        let sequence = if now == last {
            let next = (state.sequence + 1) & u64::from(MAX_SEQUENCE);
            if next == 0 {
                now = self.cold_wait_next_millis(last);
            }
            next
        } else {
            0
        };

        state.last_timestamp = now;
        state.sequence = sequence;

        Ok(SnowflakeId::from_components(
            now,
            u64::from(self.worker_id),
            sequence,
        ))
    }

    /// Spins until the time source reads strictly past `last`.
    #[cold]
    #[inline(never)]
    fn cold_wait_next_millis(&self, last: u64) -> u64 {
        #[cfg(feature = "tracing")]
        tracing::debug!(last, "sequence exhausted, waiting for next millisecond");

        loop {
            let now = self.time.current_millis();
            if now > last {
                return now;
            }
            core::hint::spin_loop();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, behind_ms = last - now, "clock moved backwards");

        Error::ClockRegression { now, last }
    }
}

impl<T> Clone for LockSnowflakeGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            worker_id: self.worker_id,
            time: self.time.clone(),
        }
    }
}

impl<T> core::fmt::Debug for LockSnowflakeGenerator<T>
where
    T: TimeSource + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockSnowflakeGenerator")
            .field("worker_id", &self.worker_id)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl<T> SnowflakeGenerator<T> for LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn new(worker_id: u32, time: T) -> Result<Self> {
        Self::new(worker_id, time)
    }

    fn worker_id(&self) -> u32 {
        self.worker_id()
    }

    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }
}
