use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use tracing::{debug, trace, warn};

use drossel_core::{ExecutionContext, SchedulerId, Task, TaskRef};

use crate::metrics::SchedulerMetrics;

use super::core::{DispatchState, Scheduler};

impl Scheduler {
    /// Queue a task and, when a concurrency slot is free, claim it and
    /// request one new dispatch loop from the pool.
    pub(super) fn enqueue(&self, task: TaskRef) {
        let activate = {
            let mut state = self.lock_state();
            trace!("queueing task: {}", task.name());
            state.pending.push_back(task);
            if state.active_dispatchers < self.config.max_concurrency {
                state.active_dispatchers += 1;
                true
            } else {
                false
            }
        };

        // The slot was claimed under the lock; the pool callback releases it
        // when its loop retires.
        if activate {
            if let Ok(mut m) = self.metrics.write() {
                m.dispatchers_started += 1;
            }
            let state = Arc::clone(&self.state);
            let metrics = Arc::clone(&self.metrics);
            let id = self.id;
            self.pool
                .spawn(Box::new(move || dispatch_loop(&state, &metrics, id)));
        }
    }
}

/// One dispatch loop: pop the queue head under the lock, execute it outside
/// the lock, repeat until the queue is observed empty, then retire and
/// release the concurrency slot.
fn dispatch_loop(
    state: &Mutex<DispatchState>,
    metrics: &RwLock<SchedulerMetrics>,
    id: SchedulerId,
) {
    let cx = ExecutionContext::dispatching(id);
    loop {
        let task = {
            let mut guard = state.lock().expect("scheduler state lock poisoned");
            match guard.pending.pop_front() {
                Some(task) => task,
                None => {
                    guard.active_dispatchers -= 1;
                    break;
                }
            }
        };
        run_task(&cx, &task, metrics);
    }
    trace!("dispatcher retired");
}

/// Execute one task, containing panics so one failing body cannot take the
/// worker thread away from the rest of the queue.
pub(super) fn run_task(cx: &ExecutionContext, task: &TaskRef, metrics: &RwLock<SchedulerMetrics>) {
    debug!("executing task: {}", task.name());
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.execute(cx)));
    let elapsed = started.elapsed();

    match outcome {
        Ok(()) => {
            debug!("task {} completed in {:?}", task.name(), elapsed);
            if let Ok(mut m) = metrics.write() {
                m.record_execution(task.name(), elapsed);
            }
        }
        Err(payload) => {
            warn!(
                "task {} panicked: {}",
                task.name(),
                panic_message(payload.as_ref())
            );
            if let Ok(mut m) = metrics.write() {
                m.record_panic();
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<opaque panic payload>"
    }
}
