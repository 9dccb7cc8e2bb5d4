use crate::context::ExecutionContext;
use crate::error::SchedulerError;
use crate::task::TaskRef;

/// Capability surface of a bounded task scheduler.
///
/// Producers and executor plumbing depend on this trait rather than a
/// concrete scheduler type, so swapping the implementation (or handing a
/// consumer a restricted view) needs no inheritance machinery.
pub trait TaskScheduler: Send + Sync {
    /// Queue a task for execution.
    ///
    /// The task must not already be queued in this scheduler; duplicate
    /// submission is a caller bug and is not detected here. Never blocks on
    /// task execution, only briefly on the scheduler's state lock.
    fn submit(&self, task: TaskRef);

    /// Try to run `task` synchronously on the calling thread.
    ///
    /// Succeeds only when `cx` belongs to one of this scheduler's dispatch
    /// loops and, for a previously queued task, when the task could still be
    /// claimed from the pending queue. Returns `false` when the caller must
    /// fall back to normal queued execution.
    fn try_execute_inline(
        &self,
        cx: &ExecutionContext,
        task: &TaskRef,
        previously_queued: bool,
    ) -> bool;

    /// Atomically remove a still-pending task from the queue.
    ///
    /// Returns `true` when the task was found and removed; the caller then
    /// owns it and may run or discard it. Returns `false` when it was
    /// already popped by a dispatcher, already removed, or never queued.
    fn try_dequeue(&self, task: &TaskRef) -> bool;

    /// Point-in-time defensive copy of the pending queue, oldest first.
    ///
    /// Fails fast with [`SchedulerError::SnapshotContended`] instead of
    /// blocking when the state lock is held elsewhere.
    fn try_scheduled_snapshot(&self) -> Result<Vec<TaskRef>, SchedulerError>;

    /// The configured concurrency ceiling.
    fn max_concurrency(&self) -> usize;
}
