//! Trailing-edge debouncing on the virtual timer queue.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::browser::{Scheduler, TimerId};

/// Runs only the last of a burst of calls, once `delay` has passed without a
/// newer call.
pub struct Debouncer {
    scheduler: Rc<Scheduler>,
    delay: Duration,
    pending: Cell<Option<TimerId>>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl Debouncer {
    #[must_use]
    pub fn new(scheduler: Rc<Scheduler>, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: Cell::new(None),
        }
    }

    /// Replaces any pending call with `task`.
    pub fn call(&self, task: impl FnOnce() + 'static) {
        self.cancel();
        let id = self.scheduler.set_timeout(self.delay, task);
        self.pending.set(Some(id));
    }

    /// Drops the pending call, if any.
    pub fn cancel(&self) -> bool {
        self.pending
            .take()
            .is_some_and(|id| self.scheduler.clear_timeout(id))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .get()
            .is_some_and(|id| self.scheduler.is_pending(id))
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
