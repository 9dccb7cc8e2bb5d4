use std::sync::TryLockError;

use tracing::{debug, trace};

use drossel_core::{same_task, ExecutionContext, SchedulerError, Task, TaskRef};

use super::core::Scheduler;
use super::dispatch::run_task;

impl Scheduler {
    /// Remove a still-pending task from the queue, matched by identity.
    ///
    /// This is the only race-free way to claim a queued task away from
    /// concurrent dispatchers: whoever removes it under the lock owns it.
    pub(super) fn dequeue(&self, task: &TaskRef) -> bool {
        let removed = {
            let mut state = self.lock_state();
            match state
                .pending
                .iter()
                .position(|queued| same_task(queued, task))
            {
                Some(index) => {
                    state.pending.remove(index);
                    true
                }
                None => false,
            }
        };

        if removed {
            debug!("dequeued task: {}", task.name());
            if let Ok(mut m) = self.metrics.write() {
                m.tasks_dequeued += 1;
            }
        }
        removed
    }

    /// Execute `task` on the calling thread when that thread is running one
    /// of this scheduler's dispatch loops; otherwise refuse.
    ///
    /// Runs on the caller's existing dispatcher slot, so the concurrency cap
    /// is never exceeded. A previously queued task must win the dequeue race
    /// first; losing it means another dispatcher already owns the task.
    pub(super) fn inline_execute(
        &self,
        cx: &ExecutionContext,
        task: &TaskRef,
        previously_queued: bool,
    ) -> bool {
        if !cx.dispatches_for(self.id) {
            trace!(
                "inline refused for {}: caller is not dispatching for this scheduler",
                task.name()
            );
            return false;
        }

        if previously_queued && !self.dequeue(task) {
            trace!("inline refused for {}: task no longer pending", task.name());
            return false;
        }

        run_task(cx, task, &self.metrics);
        if let Ok(mut m) = self.metrics.write() {
            m.inline_executions += 1;
        }
        true
    }

    /// Point-in-time defensive copy of the pending queue, oldest first.
    ///
    /// Never blocks: a contended state lock reports
    /// [`SchedulerError::SnapshotContended`] instead of a stale or partial
    /// list.
    pub(super) fn scheduled_snapshot(&self) -> Result<Vec<TaskRef>, SchedulerError> {
        match self.state.try_lock() {
            Ok(state) => Ok(state.pending.iter().cloned().collect()),
            Err(TryLockError::WouldBlock) => Err(SchedulerError::SnapshotContended),
            Err(TryLockError::Poisoned(e)) => Err(SchedulerError::LockPoisoned(e.to_string())),
        }
    }
}
