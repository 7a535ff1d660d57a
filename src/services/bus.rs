//! Typed publish/subscribe bus for cross-component refresh signals.
//!
//! Screens that mutate account state publish a [`Signal`]; screens that show
//! derived data subscribe at construction time and re-fetch when it arrives.
//!
//! # Delivery
//!
//! - Synchronous: `publish` returns after every handler ran.
//! - Ordered: handlers run in subscription order.
//! - Snapshot: handlers added during a dispatch are not called by it; handlers
//!   removed during a dispatch are skipped if they have not run yet.
//!
//! # Ownership
//!
//! [`SignalBus::subscribe`] returns a [`Subscription`] guard. Dropping the
//! guard (or calling [`Subscription::unsubscribe`]) removes the handler, so a
//! view that is torn down stops receiving signals. The guard only holds a
//! weak reference to the bus.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Refresh topics carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Signal {
    /// Card balance changed (top-up, withdrawal, transfer).
    BalanceUpdated,
    /// A transfer between cards finished.
    TransactionCompleted,
}

impl Signal {
    /// Wire name of the topic.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BalanceUpdated => "balance-updated",
            Self::TransactionCompleted => "transaction-completed",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Handler = Rc<dyn Fn()>;

#[derive(Default)]
struct BusInner {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(u64, Signal, Handler)>>,
}

impl BusInner {
    fn remove(&self, id: u64) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(existing, _, _)| *existing != id);
        subscribers.len() != before
    }

    fn contains(&self, id: u64) -> bool {
        self.subscribers
            .borrow()
            .iter()
            .any(|(existing, _, _)| *existing == id)
    }
}

/// Shared handle to the signal bus.
#[derive(Clone, Default)]
pub struct SignalBus {
    inner: Rc<BusInner>,
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBus")
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl SignalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `signal` until the returned guard is released.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, signal: Signal, handler: impl Fn() + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, signal, Rc::new(handler)));
        tracing::trace!(%signal, id, "Subscribed");
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
            signal,
        }
    }

    /// Delivers `signal` to its subscribers. Returns how many handlers ran.
    pub fn publish(&self, signal: Signal) -> usize {
        let snapshot: Vec<(u64, Handler)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .filter(|(_, topic, _)| *topic == signal)
            .map(|(id, _, handler)| (*id, Rc::clone(handler)))
            .collect();

        let _span = tracing::debug_span!("publish", %signal, subscribers = snapshot.len()).entered();
        let mut delivered = 0;
        for (id, handler) in snapshot {
            if !self.inner.contains(id) {
                continue;
            }
            handler();
            delivered += 1;
        }
        delivered
    }

    #[must_use]
    pub fn subscriber_count(&self, signal: Signal) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|(_, topic, _)| *topic == signal)
            .count()
    }
}

/// Registration guard returned by [`SignalBus::subscribe`].
pub struct Subscription {
    bus: Weak<BusInner>,
    id: u64,
    signal: Signal,
}

impl Subscription {
    #[must_use]
    pub const fn signal(&self) -> Signal {
        self.signal
    }

    /// Removes the handler now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("signal", &self.signal)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            if bus.remove(self.id) {
                tracing::trace!(signal = %self.signal, id = self.id, "Unsubscribed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_runs_only_matching_handlers_in_order() {
        let bus = SignalBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&log);
        let _a = bus.subscribe(Signal::TransactionCompleted, move || sink.borrow_mut().push("a"));
        let sink = Rc::clone(&log);
        let _b = bus.subscribe(Signal::TransactionCompleted, move || sink.borrow_mut().push("b"));
        let sink = Rc::clone(&log);
        let _c = bus.subscribe(Signal::BalanceUpdated, move || sink.borrow_mut().push("c"));

        assert_eq!(bus.publish(Signal::TransactionCompleted), 2);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn dropping_guard_unsubscribes() {
        let bus = SignalBus::new();
        let sub = bus.subscribe(Signal::BalanceUpdated, || {});
        let other = bus.subscribe(Signal::BalanceUpdated, || {});
        assert_eq!(bus.subscriber_count(Signal::BalanceUpdated), 2);
        drop(sub);
        other.unsubscribe();
        assert_eq!(bus.subscriber_count(Signal::BalanceUpdated), 0);
        assert_eq!(bus.publish(Signal::BalanceUpdated), 0);
    }

    #[test]
    fn handlers_may_unsubscribe_later_handlers_mid_dispatch() {
        let bus = SignalBus::new();
        let late: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let ran = Rc::new(Cell::new(false));

        let slot = Rc::clone(&late);
        let _first = bus.subscribe(Signal::BalanceUpdated, move || {
            slot.borrow_mut().take();
        });
        let flag = Rc::clone(&ran);
        *late.borrow_mut() = Some(bus.subscribe(Signal::BalanceUpdated, move || flag.set(true)));

        assert_eq!(bus.publish(Signal::BalanceUpdated), 1);
        assert!(!ran.get());
    }

    #[test]
    fn signal_names_match_wire_format() {
        assert_eq!(Signal::BalanceUpdated.to_string(), "balance-updated");
        let parsed: Signal = serde_json::from_str("\"transaction-completed\"").unwrap();
        assert_eq!(parsed, Signal::TransactionCompleted);
    }
}
