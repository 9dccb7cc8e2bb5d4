use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::info;

use drossel_core::{ExecutionContext, SchedulerError, SchedulerId, TaskRef, TaskScheduler};

use crate::metrics::SchedulerMetrics;
use crate::pool::WorkerPool;
use crate::types::SchedulerConfig;

/// Queue and dispatcher bookkeeping; everything behind the one state lock.
#[derive(Default)]
pub(super) struct DispatchState {
    /// Tasks awaiting execution, oldest first.
    pub(super) pending: VecDeque<TaskRef>,
    /// Dispatch loops requested from the pool and not yet retired.
    pub(super) active_dispatchers: usize,
}

/// Bounded-concurrency task scheduler over a shared worker pool.
///
/// Submitted tasks are queued FIFO and drained by up to `max_concurrency`
/// cooperative dispatch loops running on pool threads. The scheduler spawns
/// no threads of its own; once every loop observes an empty queue it is idle
/// again and reusable indefinitely.
pub struct Scheduler {
    pub(super) id: SchedulerId,
    pub(super) config: SchedulerConfig,
    pub(super) pool: Arc<dyn WorkerPool>,
    pub(super) state: Arc<Mutex<DispatchState>>,
    pub(super) metrics: Arc<RwLock<SchedulerMetrics>>,
}

impl Scheduler {
    /// Create a scheduler backed by `pool`.
    ///
    /// Fails with [`SchedulerError::InvalidConcurrency`] when the configured
    /// limit is below 1; no scheduler state is created in that case.
    pub fn new(config: SchedulerConfig, pool: Arc<dyn WorkerPool>) -> Result<Self, SchedulerError> {
        config.validate()?;
        info!(
            "scheduler created with max concurrency {}",
            config.max_concurrency
        );
        Ok(Self {
            id: SchedulerId::new(),
            config,
            pool,
            state: Arc::new(Mutex::new(DispatchState::default())),
            metrics: Arc::new(RwLock::new(SchedulerMetrics::default())),
        })
    }

    /// Number of tasks currently queued.
    pub fn pending_count(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// Dispatch loops currently requested or running.
    pub fn active_dispatchers(&self) -> usize {
        self.lock_state().active_dispatchers
    }

    /// Whether the scheduler has no queued tasks and no live dispatchers.
    pub fn is_idle(&self) -> bool {
        let state = self.lock_state();
        state.pending.is_empty() && state.active_dispatchers == 0
    }

    /// Snapshot of the scheduler metrics.
    pub fn metrics(&self) -> SchedulerMetrics {
        self.metrics.read().expect("metrics lock poisoned").clone()
    }

    // Task bodies never run under this lock, so poisoning would be a
    // scheduler bug rather than a task failure.
    pub(super) fn lock_state(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().expect("scheduler state lock poisoned")
    }
}

impl TaskScheduler for Scheduler {
    fn submit(&self, task: TaskRef) {
        self.enqueue(task);
    }

    fn try_execute_inline(
        &self,
        cx: &ExecutionContext,
        task: &TaskRef,
        previously_queued: bool,
    ) -> bool {
        self.inline_execute(cx, task, previously_queued)
    }

    fn try_dequeue(&self, task: &TaskRef) -> bool {
        self.dequeue(task)
    }

    fn try_scheduled_snapshot(&self) -> Result<Vec<TaskRef>, SchedulerError> {
        self.scheduled_snapshot()
    }

    fn max_concurrency(&self) -> usize {
        self.config.max_concurrency
    }
}
