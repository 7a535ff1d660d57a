//! The browser window: document, location, history and timers.

use std::cell::RefCell;
use std::rc::Rc;

use super::history::History;
use super::location::resolve_href;
use super::scheduler::Scheduler;
use crate::dom::{Document, ListenerId};

/// Window-level listener. Receives the pathname current at dispatch time.
pub type WindowListener = Rc<dyn Fn(&str)>;

struct WindowInner {
    document: Document,
    history: RefCell<History>,
    scheduler: Rc<Scheduler>,
    listeners: RefCell<Vec<(ListenerId, String, WindowListener)>>,
}

/// Shared handle to the simulated browser window.
#[derive(Clone)]
pub struct Window {
    inner: Rc<WindowInner>,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("location", &self.location())
            .field("history", &self.history_len())
            .finish_non_exhaustive()
    }
}

impl Window {
    /// A window at `path` whose body holds the `#app` mount point.
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self::with_document(Document::with_body(r#"<div id="app"></div>"#), path)
    }

    #[must_use]
    pub fn with_document(document: Document, path: &str) -> Self {
        Self {
            inner: Rc::new(WindowInner {
                document,
                history: RefCell::new(History::new(&resolve_href("/", path))),
                scheduler: Rc::new(Scheduler::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    #[must_use]
    pub fn scheduler(&self) -> Rc<Scheduler> {
        Rc::clone(&self.inner.scheduler)
    }

    /// Current `location.pathname`.
    #[must_use]
    pub fn location(&self) -> String {
        self.inner.history.borrow().current().to_string()
    }

    /// Resolves `href` against the current location.
    #[must_use]
    pub fn resolve(&self, href: &str) -> String {
        resolve_href(&self.location(), href)
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.inner.history.borrow().len()
    }

    /// Pushes a new entry without notifying listeners.
    pub fn push_state(&self, path: &str) {
        let path = self.resolve(path);
        self.inner.history.borrow_mut().push(&path);
    }

    /// Replaces the current entry without notifying listeners.
    pub fn replace_state(&self, path: &str) {
        let path = self.resolve(path);
        self.inner.history.borrow_mut().replace(&path);
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Traverses history and fires `popstate` synchronously when the cursor
    /// moved.
    pub fn go(&self, delta: isize) -> bool {
        let moved = self.inner.history.borrow_mut().go(delta);
        if moved {
            self.dispatch("popstate");
        }
        moved
    }

    pub fn add_event_listener(&self, kind: &str, listener: WindowListener) -> ListenerId {
        let id = ListenerId::next();
        self.inner
            .listeners
            .borrow_mut()
            .push((id, kind.to_string(), listener));
        id
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        listeners.len() != before
    }

    /// Invokes every listener for `kind` with the current pathname.
    pub fn dispatch(&self, kind: &str) {
        let path = self.location();
        let listeners: Vec<WindowListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, registered, _)| registered == kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        tracing::trace!(kind, path = %path, listeners = listeners.len(), "Window event");
        for listener in listeners {
            listener(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn traversal_fires_popstate_with_new_path() {
        let window = Window::new("/");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        window.add_event_listener(
            "popstate",
            Rc::new(move |path: &str| sink.borrow_mut().push(path.to_string())),
        );

        window.push_state("/about");
        window.push_state("contacts");
        assert_eq!(window.location(), "/contacts");
        assert!(seen.borrow().is_empty());

        assert!(window.back());
        assert!(window.back());
        assert!(!window.back());
        assert!(window.forward());
        assert_eq!(*seen.borrow(), vec!["/about", "/", "/about"]);
    }

    #[test]
    fn removed_listeners_are_not_called() {
        let window = Window::new("/");
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = window.add_event_listener("popstate", Rc::new(move |_: &str| *counter.borrow_mut() += 1));
        assert!(window.remove_event_listener(id));
        window.push_state("/about");
        window.back();
        assert_eq!(*hits.borrow(), 0);
    }
}
