//! Execution context passed into task bodies.
//!
//! The context replaces the classic thread-local "currently dispatching"
//! marker with an explicit value: a dispatch loop mints a dispatching
//! context for its own duration and hands it to every task it runs, while
//! producer-side code holds a detached one. Inlining eligibility is decided
//! from this value alone, so there is no hidden per-thread state to clean up.

use uuid::Uuid;

/// Identity of one scheduler instance.
///
/// Minted at scheduler construction; a dispatching context carries the id of
/// the scheduler whose loop created it, so a context from one scheduler can
/// never inline work into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchedulerId(Uuid);

impl SchedulerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SchedulerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the current code is running, as far as a scheduler cares.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext {
    dispatching_for: Option<SchedulerId>,
}

impl ExecutionContext {
    /// Context for code running outside any dispatch loop.
    pub fn detached() -> Self {
        Self {
            dispatching_for: None,
        }
    }

    /// Context minted by a dispatch loop of the given scheduler.
    ///
    /// Scheduler implementations create one per loop run; it lives on the
    /// loop's stack and is gone on every exit path.
    pub fn dispatching(scheduler: SchedulerId) -> Self {
        Self {
            dispatching_for: Some(scheduler),
        }
    }

    /// Whether this context belongs to any active dispatch loop.
    pub fn is_dispatching(&self) -> bool {
        self.dispatching_for.is_some()
    }

    /// Whether this context belongs to a dispatch loop of `scheduler`.
    pub fn dispatches_for(&self, scheduler: SchedulerId) -> bool {
        self.dispatching_for == Some(scheduler)
    }
}
