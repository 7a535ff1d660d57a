//! View contract and per-instance lifecycle bookkeeping.
//!
//! Every renderable unit (screens, the layout shell, child components)
//! implements [`View`]. Views are built fresh on each navigation, render
//! exactly one detached subtree, and are torn down by their owner before
//! being dropped.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed ──render()──▶ Rendered ──teardown()──▶ TornDown
//!      │                                                ▲
//!      └──────────────────teardown()────────────────────┘
//! ```
//!
//! [`ComponentBase`] holds the state every view needs for that: signal
//! subscriptions, the cancellation token for in-flight collaborator calls,
//! owned child views and the rendered root. Tearing the base down releases
//! all of it once; later calls are no-ops.

use crate::api::CancellationToken;
use crate::dom::Element;
use crate::domain::error::Result;
use crate::services::bus::Subscription;

/// A renderable unit of UI.
pub trait View {
    /// Builds the view's subtree and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns an error when a template or element query fails.
    fn render(&mut self) -> Result<Element>;

    /// Releases subscriptions, cancels pending work and tears down children.
    ///
    /// Must be idempotent.
    fn teardown(&mut self);
}

/// A top-level view mounted by the router.
pub trait Screen: View {
    /// Page name shown in the document title.
    fn title(&self) -> &str;
}

/// Lifecycle state of a component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Rendered,
    TornDown,
}

/// Shared lifecycle record embedded in every component.
pub struct ComponentBase {
    name: &'static str,
    lifecycle: Lifecycle,
    subscriptions: Vec<Subscription>,
    token: CancellationToken,
    children: Vec<Box<dyn View>>,
    element: Option<Element>,
}

impl std::fmt::Debug for ComponentBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentBase")
            .field("name", &self.name)
            .field("lifecycle", &self.lifecycle)
            .field("subscriptions", &self.subscriptions.len())
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl ComponentBase {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            lifecycle: Lifecycle::Constructed,
            subscriptions: Vec::new(),
            token: CancellationToken::new(),
            children: Vec::new(),
            element: None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Token passed to every collaborator call made by this component.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Keeps `subscription` alive until teardown.
    pub fn track(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Renders `child` and keeps it for teardown.
    ///
    /// # Errors
    ///
    /// Propagates the child's render error.
    pub fn mount_child(&mut self, mut child: Box<dyn View>) -> Result<Element> {
        let element = child.render()?;
        self.children.push(child);
        Ok(element)
    }

    /// Records the rendered root. A second render is allowed but leaves the
    /// first subtree detached, so it is logged.
    pub fn rendered(&mut self, element: &Element) {
        match self.lifecycle {
            Lifecycle::Constructed => {}
            Lifecycle::Rendered => {
                tracing::warn!(component = self.name, "Rendered twice; previous subtree is detached");
            }
            Lifecycle::TornDown => {
                tracing::warn!(component = self.name, "Rendered after teardown");
                return;
            }
        }
        self.element = Some(element.clone());
        self.lifecycle = Lifecycle::Rendered;
    }

    #[must_use]
    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// Cancels in-flight calls, drops subscriptions and tears children down.
    /// Returns `false` if the component was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.lifecycle == Lifecycle::TornDown {
            return false;
        }
        self.token.cancel();
        let released = self.subscriptions.len();
        self.subscriptions.clear();
        for mut child in self.children.drain(..) {
            child.teardown();
        }
        self.lifecycle = Lifecycle::TornDown;
        tracing::trace!(component = self.name, released, "Torn down");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::bus::{Signal, SignalBus};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe {
        base: ComponentBase,
        teardowns: Rc<Cell<u32>>,
    }

    impl View for Probe {
        fn render(&mut self) -> Result<Element> {
            let element = Element::new("span");
            self.base.rendered(&element);
            Ok(element)
        }

        fn teardown(&mut self) {
            if self.base.teardown() {
                self.teardowns.set(self.teardowns.get() + 1);
            }
        }
    }

    #[test]
    fn teardown_releases_everything_once() {
        let bus = SignalBus::new();
        let teardowns = Rc::new(Cell::new(0));
        let mut base = ComponentBase::new("parent");
        base.track(bus.subscribe(Signal::BalanceUpdated, || {}));
        let child = Probe {
            base: ComponentBase::new("child"),
            teardowns: Rc::clone(&teardowns),
        };
        base.mount_child(Box::new(child)).unwrap();
        let token = base.token().clone();

        assert!(base.teardown());
        assert!(!base.teardown());
        assert_eq!(base.lifecycle(), Lifecycle::TornDown);
        assert!(token.is_cancelled());
        assert_eq!(bus.subscriber_count(Signal::BalanceUpdated), 0);
        assert_eq!(teardowns.get(), 1);
    }

    #[test]
    fn render_after_teardown_is_ignored() {
        let mut base = ComponentBase::new("late");
        base.teardown();
        base.rendered(&Element::new("div"));
        assert!(base.element().is_none());
        assert_eq!(base.lifecycle(), Lifecycle::TornDown);
    }
}
