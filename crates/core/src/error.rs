//! Scheduler error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid max concurrency {0}: must be at least 1")]
    InvalidConcurrency(usize),

    #[error("pending snapshot unavailable: scheduler state is busy")]
    SnapshotContended,

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}
