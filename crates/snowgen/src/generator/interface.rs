use crate::{Result, SnowflakeId, TimeSource, WorkerIdProvider};

/// A minimal interface for generating Snowflake IDs.
///
/// Implementors own a worker id and a [`TimeSource`], and hand out strictly
/// increasing IDs from a shared reference.
pub trait SnowflakeGenerator<T>: Sized
where
    T: TimeSource,
{
    /// Creates a new generator for `worker_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidWorkerId`] if `worker_id` exceeds
    /// [`crate::MAX_WORKER_ID`].
    fn new(worker_id: u32, time: T) -> Result<Self>;

    /// Creates a new generator whose worker id comes from `provider`.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::new`].
    fn from_provider<P>(provider: &P, time: T) -> Result<Self>
    where
        P: WorkerIdProvider + ?Sized,
    {
        Self::new(provider.worker_id(), time)
    }

    /// The worker id embedded in every ID this generator produces.
    fn worker_id(&self) -> u32;

    /// Generates the next ID, waiting out the current millisecond if its
    /// sequence space is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ClockRegression`] if the time source reads
    /// earlier than the last issued ID, and may return
    /// [`crate::Error::LockPoisoned`] for lock-based implementations.
    fn next_id(&self) -> Result<SnowflakeId>;
}
