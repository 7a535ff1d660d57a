//! Virtual-time timer queue.
//!
//! Stands in for `setTimeout`/`clearTimeout`. Time never moves on its own:
//! callers drive it with [`Scheduler::advance`] or drain it with
//! [`Scheduler::run_until_idle`], which keeps every deferred behaviour
//! (notification auto-hide, debounced search, artificial loader delays,
//! simulated API latency) deterministic under test.
//!
//! Tasks due at the same instant run in the order they were scheduled.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Deferred work item.
pub type Task = Box<dyn FnOnce()>;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Upper bound on tasks drained by one `run_until_idle` call, so a task that
/// keeps rescheduling itself cannot hang the caller.
const IDLE_TASK_LIMIT: usize = 100_000;

#[derive(Default)]
struct Queue {
    tasks: BTreeMap<(Duration, u64), Task>,
    due: HashMap<TimerId, Duration>,
}

/// Single-threaded timer queue over a virtual clock.
#[derive(Default)]
pub struct Scheduler {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    queue: RefCell<Queue>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the scheduler was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Whether `id` is still scheduled.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.borrow().due.contains_key(&id)
    }

    /// Schedules `task` to run `delay` after the current virtual time.
    pub fn set_timeout(&self, delay: Duration, task: impl FnOnce() + 'static) -> TimerId {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let id = TimerId(seq);
        let due = self.now.get() + delay;

        let mut queue = self.queue.borrow_mut();
        queue.tasks.insert((due, seq), Box::new(task));
        queue.due.insert(id, due);
        id
    }

    /// Cancels a pending task. Returns `false` if it already ran or was
    /// cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut queue = self.queue.borrow_mut();
        match queue.due.remove(&id) {
            Some(due) => queue.tasks.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    fn pop_due(&self, limit: Option<Duration>) -> Option<Task> {
        let mut queue = self.queue.borrow_mut();
        let (&(due, seq), _) = queue.tasks.iter().next()?;
        if limit.is_some_and(|limit| due > limit) {
            return None;
        }
        let task = queue.tasks.remove(&(due, seq))?;
        queue.due.remove(&TimerId(seq));
        drop(queue);
        if due > self.now.get() {
            self.now.set(due);
        }
        Some(task)
    }

    /// Moves the clock forward by `by`, running every task that falls due,
    /// including tasks scheduled by those tasks. Returns how many ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut ran = 0;
        while let Some(task) = self.pop_due(Some(target)) {
            task();
            ran += 1;
        }
        self.now.set(target);
        ran
    }

    /// Runs tasks in due order until the queue is empty, jumping the clock to
    /// each task's due time. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while ran < IDLE_TASK_LIMIT {
            let Some(task) = self.pop_due(None) else {
                return ran;
            };
            task();
            ran += 1;
        }
        tracing::warn!(ran, pending = self.pending(), "Timer queue did not go idle");
        ran
    }
}
