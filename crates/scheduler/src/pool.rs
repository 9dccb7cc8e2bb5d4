//! Worker pool seam.
//!
//! The scheduler never spawns threads; it requests fire-and-forget execution
//! slots from a pre-existing pool through [`WorkerPool`]. Production code
//! hands it a [`rayon::ThreadPool`]; tests drive a captured-job pool by hand.

use std::sync::Arc;

/// Fire-and-forget execution slot provider.
pub trait WorkerPool: Send + Sync {
    /// Run `job` asynchronously on some worker thread, independent of the
    /// caller. The scheduler invokes this at most once per granted
    /// concurrency slot; nothing is reported back through this seam.
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>);
}

impl WorkerPool for rayon::ThreadPool {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        rayon::ThreadPool::spawn(self, job);
    }
}

/// Build a rayon pool with `worker_threads` threads (0 = rayon's default,
/// one per core).
pub fn build_worker_pool(
    worker_threads: usize,
) -> Result<Arc<rayon::ThreadPool>, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .thread_name(|i| format!("drossel-worker-{i}"))
        .build()?;
    Ok(Arc::new(pool))
}
