//! DOM events and listener registrations.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::node::Element;

/// Callback invoked for each event dispatched to a node.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Handle returned by `add_event_listener`, used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

thread_local! {
    static NEXT_LISTENER: Cell<u64> = const { Cell::new(1) };
}

impl ListenerId {
    pub(crate) fn next() -> Self {
        NEXT_LISTENER.with(|next| {
            let id = next.get();
            next.set(id + 1);
            Self(id)
        })
    }
}

pub(crate) struct Registration {
    pub(crate) id: ListenerId,
    pub(crate) kind: String,
    pub(crate) listener: Listener,
}

impl Registration {
    pub(crate) fn new(kind: &str, listener: Listener) -> Self {
        Self {
            id: ListenerId::next(),
            kind: kind.to_string(),
            listener,
        }
    }
}

/// A dispatched event. Bubbles from `target` to the root.
pub struct Event {
    kind: String,
    target: Element,
    current_target: RefCell<Option<Element>>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    #[must_use]
    pub fn new(kind: &str, target: Element) -> Self {
        Self {
            kind: kind.to_string(),
            target,
            current_target: RefCell::new(None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Element the event was originally dispatched to.
    #[must_use]
    pub fn target(&self) -> &Element {
        &self.target
    }

    /// Element whose listener is currently running.
    #[must_use]
    pub fn current_target(&self) -> Option<Element> {
        self.current_target.borrow().clone()
    }

    pub(crate) fn set_current_target(&self, el: &Element) {
        *self.current_target.borrow_mut() = Some(el.clone());
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("default_prevented", &self.default_prevented.get())
            .finish_non_exhaustive()
    }
}
