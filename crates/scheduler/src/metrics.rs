use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scheduler operational metrics.
///
/// Updated strictly outside the scheduler's state lock; readers get a clone
/// via [`crate::Scheduler::metrics`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerMetrics {
    /// Total tasks executed by name.
    pub tasks_executed: HashMap<String, u64>,
    /// Average task duration by task name.
    pub avg_task_duration: HashMap<String, Duration>,
    /// Last execution time by task name.
    pub last_run: HashMap<String, DateTime<Utc>>,
    /// Dispatch loops requested from the worker pool.
    pub dispatchers_started: u64,
    /// Tasks executed inline on a dispatcher thread.
    pub inline_executions: u64,
    /// Tasks removed from the queue before any dispatcher reached them.
    pub tasks_dequeued: u64,
    /// Tasks whose body panicked.
    pub tasks_panicked: u64,
}

impl SchedulerMetrics {
    /// Record a completed task execution.
    pub fn record_execution(&mut self, task_name: &str, duration: Duration) {
        *self.tasks_executed.entry(task_name.to_string()).or_default() += 1;
        self.last_run.insert(task_name.to_string(), Utc::now());

        // Update rolling average duration
        let count = self.tasks_executed[task_name];
        let prev_avg = self
            .avg_task_duration
            .get(task_name)
            .copied()
            .unwrap_or_default();

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let new_avg = if count == 1 {
            duration
        } else {
            let prev_nanos = prev_avg.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };

        self.avg_task_duration
            .insert(task_name.to_string(), new_avg);
    }

    /// Record a task body panic.
    pub fn record_panic(&mut self) {
        self.tasks_panicked += 1;
    }
}
