/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowgen` can emit.
///
/// [`Error::InvalidWorkerId`] is only produced while constructing a generator.
/// [`Error::ClockRegression`] is produced per call and leaves the generator
/// untouched, so the caller may simply try again once the clock catches up.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The worker id does not fit in the 10-bit worker field.
    #[error("worker id {worker_id} is invalid (max = {max})")]
    InvalidWorkerId {
        /// The rejected value.
        worker_id: u32,
        /// The largest accepted value.
        max: u32,
    },

    /// The time source reported a timestamp earlier than the one used for the
    /// previously issued ID.
    #[error("clock moved backwards: {now} precedes last timestamp {last}")]
    ClockRegression {
        /// The timestamp observed during this call.
        now: u64,
        /// The timestamp embedded in the last issued ID.
        last: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
