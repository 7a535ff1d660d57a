//! The document: a root `<html>` element with head, body and title.

use std::cell::RefCell;
use std::rc::Rc;

use super::event::{Listener, ListenerId};
use super::node::Element;
use crate::domain::error::Result;

struct DocumentInner {
    root: Element,
    body: Element,
    title: RefCell<String>,
}

/// Shared handle to the page document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("title", &*self.inner.title.borrow())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// An empty `<html><head></head><body></body></html>` document.
    #[must_use]
    pub fn new() -> Self {
        let root = Element::new("html");
        let head = Element::new("head");
        let body = Element::new("body");
        root.push_child(super::node::Child::Element(head));
        root.push_child(super::node::Child::Element(body.clone()));
        Self {
            inner: Rc::new(DocumentInner {
                root,
                body,
                title: RefCell::new(String::new()),
            }),
        }
    }

    /// A document whose body holds `markup`.
    #[must_use]
    pub fn with_body(markup: &str) -> Self {
        let document = Self::new();
        document.body().set_inner_html(markup);
        document
    }

    /// The `<html>` element; document-level listeners live here.
    #[must_use]
    pub fn document_element(&self) -> Element {
        self.inner.root.clone()
    }

    #[must_use]
    pub fn body(&self) -> Element {
        self.inner.body.clone()
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.inner.title.borrow().clone()
    }

    pub fn set_title(&self, title: &str) {
        *self.inner.title.borrow_mut() = title.to_string();
    }

    /// First element in the document matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed selector.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>> {
        self.inner.root.query_selector(selector)
    }

    /// Every element in the document matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed selector.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>> {
        self.inner.root.query_selector_all(selector)
    }

    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.inner
            .root
            .descendants()
            .into_iter()
            .find(|el| el.id().as_deref() == Some(id))
    }

    /// Registers a listener that sees every bubbling event in the document.
    pub fn add_event_listener(&self, kind: &str, listener: Listener) -> ListenerId {
        self.inner.root.add_event_listener(kind, listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.root.remove_event_listener(id)
    }

    /// Serialized `<html>` tree.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.inner.root.outer_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_markup_is_queryable() {
        let doc = Document::with_body(r#"<div id="app"></div>"#);
        assert!(doc.get_element_by_id("app").is_some());
        assert!(doc.query_selector("body > #app").unwrap().is_some());
        assert_eq!(
            doc.to_html(),
            r#"<html><head></head><body><div id="app"></div></body></html>"#
        );
    }

    #[test]
    fn title_is_mutable() {
        let doc = Document::new();
        doc.set_title("Home | Red Bank");
        assert_eq!(doc.title(), "Home | Red Bank");
    }
}
