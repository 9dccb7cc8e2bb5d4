//! Bounded-concurrency task scheduling on a shared worker pool.
//!
//! Producers submit [`drossel_core::Task`]s through the
//! [`drossel_core::TaskScheduler`] capability trait; a shared FIFO queue
//! holds them, and up to `max_concurrency` cooperative dispatch loops
//! borrowed from an underlying worker pool drain the queue. The scheduler
//! spawns no threads of its own.

pub mod metrics;
pub mod pool;
pub mod runner;
pub mod types;

pub use metrics::SchedulerMetrics;
pub use pool::{build_worker_pool, WorkerPool};
pub use runner::Scheduler;
pub use types::{ConfigError, SchedulerConfig};
