use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::context::ExecutionContext;

/// A unit of deferred work the scheduler can execute.
///
/// Implementations are shared between the producer and the scheduler via
/// [`TaskRef`] until executed or dequeued. The scheduler invokes `execute`
/// at most once per task instance; completion and errors travel through
/// whatever channel the task itself carries, never through the scheduler.
pub trait Task: Send + Sync {
    /// Human-readable name for logging and metrics.
    fn name(&self) -> &str;

    /// Run the task body. Called at most once, always outside the
    /// scheduler's state lock.
    fn execute(&self, cx: &ExecutionContext);
}

/// Shared handle to a task.
///
/// Queue membership is matched by pointer identity, see [`same_task`].
pub type TaskRef = Arc<dyn Task>;

/// Whether two handles refer to the same task instance.
pub fn same_task(a: &TaskRef, b: &TaskRef) -> bool {
    Arc::ptr_eq(a, b)
}

type TaskBody = Box<dyn FnOnce(&ExecutionContext) + Send>;

/// Closure-backed [`Task`].
///
/// The body is consumed on first execution. A second invocation is a
/// contract violation by the caller; it logs a warning and does nothing.
pub struct FnTask {
    name: String,
    body: Mutex<Option<TaskBody>>,
}

impl FnTask {
    pub fn new(
        name: impl Into<String>,
        body: impl FnOnce(&ExecutionContext) + Send + 'static,
    ) -> TaskRef {
        Arc::new(Self {
            name: name.into(),
            body: Mutex::new(Some(Box::new(body))),
        })
    }
}

impl Task for FnTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, cx: &ExecutionContext) {
        let body = self.body.lock().expect("task body lock poisoned").take();
        match body {
            Some(body) => body(cx),
            None => warn!("task {} executed more than once", self.name),
        }
    }
}
