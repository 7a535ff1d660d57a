//! Element tree nodes.
//!
//! An [`Element`] is a cheap, clonable handle to a shared node. Handles compare
//! equal only when they point at the same node, which is what "the chrome is
//! the same element" means throughout the crate.
//!
//! Children are either elements or text runs. Parents are held weakly so a
//! detached subtree is freed once the last handle to it goes away.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::event::{Event, Listener, ListenerId, Registration};
use super::html;
use super::selector::Selector;
use crate::domain::error::{AppError, Result};

/// A child slot of an element.
#[derive(Clone)]
pub(crate) enum Child {
    Element(Element),
    Text(Rc<RefCell<String>>),
}

pub(crate) struct ElementNode {
    tag: String,
    attributes: RefCell<Vec<(String, String)>>,
    value: RefCell<String>,
    listeners: RefCell<Vec<Registration>>,
    parent: RefCell<Weak<ElementNode>>,
    children: RefCell<Vec<Child>>,
}

/// Handle to one element of a document tree.
#[derive(Clone)]
pub struct Element {
    node: Rc<ElementNode>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.node.tag)?;
        if let Some(id) = self.attribute("id") {
            write!(f, " id=\"{id}\"")?;
        }
        if let Some(class) = self.attribute("class") {
            write!(f, " class=\"{class}\"")?;
        }
        write!(f, ">")
    }
}

impl Element {
    /// Creates a detached element. Tag names are stored lowercase.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            node: Rc::new(ElementNode {
                tag: tag.to_ascii_lowercase(),
                attributes: RefCell::new(Vec::new()),
                value: RefCell::new(String::new()),
                listeners: RefCell::new(Vec::new()),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Parses `html` and returns its first top-level element.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] if the fragment holds no element.
    pub fn from_html(html: &str) -> Result<Self> {
        html::parse_fragment(html)
            .into_iter()
            .find_map(|child| match child {
                Child::Element(el) => Some(el),
                Child::Text(_) => None,
            })
            .ok_or_else(|| AppError::InvalidArgument(format!("no element in fragment {html:?}")))
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.node.tag
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.node
            .attributes
            .borrow()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.node.attributes.borrow().iter().any(|(key, _)| key == name)
    }

    /// Sets an attribute, preserving the position of an existing one.
    ///
    /// Setting `value` on an `<input>` also resets its live value.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        {
            let mut attributes = self.node.attributes.borrow_mut();
            if let Some(slot) = attributes.iter_mut().find(|(key, _)| *key == name) {
                slot.1 = value.to_string();
            } else {
                attributes.push((name.clone(), value.to_string()));
            }
        }
        if name == "value" && self.node.tag == "input" {
            *self.node.value.borrow_mut() = value.to_string();
        }
    }

    /// Removes an attribute, returning whether it was present.
    pub fn remove_attribute(&self, name: &str) -> bool {
        let mut attributes = self.node.attributes.borrow_mut();
        let before = attributes.len();
        attributes.retain(|(key, _)| key != name);
        attributes.len() != before
    }

    /// All attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.node.attributes.borrow().clone()
    }

    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    #[must_use]
    pub fn class_list(&self) -> Vec<String> {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.class_list().iter().any(|class| class == name)
    }

    pub fn add_class(&self, name: &str) {
        if name.is_empty() || self.has_class(name) {
            return;
        }
        let mut classes = self.class_list();
        classes.push(name.to_string());
        self.set_attribute("class", &classes.join(" "));
    }

    pub fn remove_class(&self, name: &str) {
        if !self.has_class(name) {
            return;
        }
        let classes: Vec<String> = self
            .class_list()
            .into_iter()
            .filter(|class| class != name)
            .collect();
        self.set_attribute("class", &classes.join(" "));
    }

    fn style_declarations(&self) -> Vec<(String, String)> {
        self.attribute("style")
            .map(|style| {
                style
                    .split(';')
                    .filter_map(|decl| {
                        let (prop, value) = decl.split_once(':')?;
                        let prop = prop.trim();
                        (!prop.is_empty()).then(|| (prop.to_string(), value.trim().to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn write_style(&self, declarations: &[(String, String)]) {
        if declarations.is_empty() {
            self.remove_attribute("style");
            return;
        }
        let style = declarations
            .iter()
            .map(|(prop, value)| format!("{prop}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("style", &style);
    }

    #[must_use]
    pub fn style_property(&self, property: &str) -> Option<String> {
        self.style_declarations()
            .into_iter()
            .find(|(prop, _)| prop == property)
            .map(|(_, value)| value)
    }

    pub fn set_style_property(&self, property: &str, value: &str) {
        let mut declarations = self.style_declarations();
        if let Some(slot) = declarations.iter_mut().find(|(prop, _)| prop == property) {
            slot.1 = value.to_string();
        } else {
            declarations.push((property.to_string(), value.to_string()));
        }
        self.write_style(&declarations);
    }

    pub fn remove_style_property(&self, property: &str) {
        let mut declarations = self.style_declarations();
        declarations.retain(|(prop, _)| prop != property);
        self.write_style(&declarations);
    }

    /// The `type` of an `<input>`, defaulting to `text` like browsers do.
    #[must_use]
    pub fn input_type(&self) -> Option<String> {
        (self.node.tag == "input").then(|| {
            self.attribute("type")
                .map_or_else(|| "text".to_string(), |t| t.to_ascii_lowercase())
        })
    }

    /// Live value of a form control.
    #[must_use]
    pub fn value(&self) -> String {
        self.node.value.borrow().clone()
    }

    pub fn set_value(&self, value: &str) {
        *self.node.value.borrow_mut() = value.to_string();
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node.parent.borrow().upgrade().map(|node| Self { node })
    }

    /// Topmost ancestor (the element itself when detached).
    #[must_use]
    pub fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Element children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.node
            .children
            .borrow()
            .iter()
            .filter_map(|child| match child {
                Child::Element(el) => Some(el.clone()),
                Child::Text(_) => None,
            })
            .collect()
    }

    pub(crate) fn child_nodes(&self) -> Vec<Child> {
        self.node.children.borrow().clone()
    }

    /// Whether `other` is this element or one of its descendants.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(el) = current {
            if el == *self {
                return true;
            }
            current = el.parent();
        }
        false
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(el) = stack.pop() {
            stack.extend(el.children().into_iter().rev());
            out.push(el);
        }
        out
    }

    fn detach_from_parent(&self) {
        if let Some(parent) = self.parent() {
            parent
                .node
                .children
                .borrow_mut()
                .retain(|child| !matches!(child, Child::Element(el) if el == self));
        }
        *self.node.parent.borrow_mut() = Weak::new();
    }

    fn refuse_cycle(&self, child: &Self) -> Result<()> {
        if child.contains(self) {
            return Err(AppError::InvalidArgument(format!(
                "cannot insert {child:?} into its own subtree"
            )));
        }
        Ok(())
    }

    pub(crate) fn push_child(&self, child: Child) {
        if let Child::Element(el) = &child {
            el.detach_from_parent();
            *el.node.parent.borrow_mut() = Rc::downgrade(&self.node);
        }
        self.node.children.borrow_mut().push(child);
    }

    /// Appends `child` as the last child, moving it out of its old parent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] when `child` is an ancestor of
    /// (or identical to) `self`.
    pub fn append_child(&self, child: &Self) -> Result<()> {
        self.refuse_cycle(child)?;
        self.push_child(Child::Element(child.clone()));
        Ok(())
    }

    pub fn append_text(&self, text: &str) {
        self.push_child(Child::Text(Rc::new(RefCell::new(text.to_string()))));
    }

    /// Inserts `new` immediately before `self` in its parent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when `self` has no parent, and
    /// [`AppError::InvalidArgument`] when the insertion would create a cycle.
    pub fn insert_before_self(&self, new: &Self) -> Result<()> {
        let parent = self
            .parent()
            .ok_or_else(|| AppError::NotFound(format!("parent of {self:?}")))?;
        parent.refuse_cycle(new)?;
        if new == self {
            return Ok(());
        }
        new.detach_from_parent();
        let mut children = parent.node.children.borrow_mut();
        let position = children
            .iter()
            .position(|child| matches!(child, Child::Element(el) if el == self))
            .unwrap_or(children.len());
        children.insert(position, Child::Element(new.clone()));
        *new.node.parent.borrow_mut() = Rc::downgrade(&parent.node);
        Ok(())
    }

    /// Replaces `self` with `new` in its parent.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Element::insert_before_self`].
    pub fn replace_with(&self, new: &Self) -> Result<()> {
        self.insert_before_self(new)?;
        if new != self {
            self.detach_from_parent();
        }
        Ok(())
    }

    /// Detaches this element from its parent.
    pub fn remove(&self) {
        self.detach_from_parent();
    }

    /// Drops every child node.
    pub fn clear_children(&self) {
        let children = std::mem::take(&mut *self.node.children.borrow_mut());
        for child in children {
            if let Child::Element(el) = child {
                *el.node.parent.borrow_mut() = Weak::new();
            }
        }
    }

    /// Concatenated text of all descendant text runs.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in self.child_nodes() {
            match child {
                Child::Text(text) => out.push_str(&text.borrow()),
                Child::Element(el) => out.push_str(&el.text_content()),
            }
        }
        out
    }

    /// Replaces all children with a single text run.
    pub fn set_text_content(&self, text: &str) {
        self.clear_children();
        if !text.is_empty() {
            self.append_text(text);
        }
    }

    #[must_use]
    pub fn inner_html(&self) -> String {
        html::serialize_children(self)
    }

    #[must_use]
    pub fn outer_html(&self) -> String {
        html::serialize_element(self)
    }

    /// Replaces all children with the parsed fragment.
    pub fn set_inner_html(&self, markup: &str) {
        self.clear_children();
        for child in html::parse_fragment(markup) {
            self.push_child(child);
        }
    }

    /// Whether this element matches `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] for a malformed selector.
    pub fn matches(&self, selector: &str) -> Result<bool> {
        Ok(Selector::parse(selector)?.matches(self))
    }

    /// First descendant matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] for a malformed selector.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Self>> {
        let selector = Selector::parse(selector)?;
        Ok(self.descendants().into_iter().find(|el| selector.matches(el)))
    }

    /// All descendants matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] for a malformed selector.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants()
            .into_iter()
            .filter(|el| selector.matches(el))
            .collect())
    }

    /// Nearest inclusive ancestor matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] for a malformed selector.
    pub fn closest(&self, selector: &str) -> Result<Option<Self>> {
        let selector = Selector::parse(selector)?;
        let mut current = Some(self.clone());
        while let Some(el) = current {
            if selector.matches(&el) {
                return Ok(Some(el));
            }
            current = el.parent();
        }
        Ok(None)
    }

    /// Registers `listener` for events of `kind` on this element.
    pub fn add_event_listener(&self, kind: &str, listener: Listener) -> ListenerId {
        let registration = Registration::new(kind, listener);
        let id = registration.id;
        self.node.listeners.borrow_mut().push(registration);
        id
    }

    /// Removes a listener, returning whether it was registered here.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.node.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|registration| registration.id != id);
        listeners.len() != before
    }

    #[must_use]
    pub fn listener_count(&self, kind: &str) -> usize {
        self.node
            .listeners
            .borrow()
            .iter()
            .filter(|registration| registration.kind == kind)
            .count()
    }

    /// Dispatches `event`, bubbling from its target up to the root.
    ///
    /// Listeners are snapshotted per node before invocation, so a listener may
    /// freely mutate the tree or its own registrations.
    pub fn dispatch_event(&self, event: &Event) {
        let mut current = Some(self.clone());
        while let Some(el) = current {
            if event.propagation_stopped() {
                break;
            }
            event.set_current_target(&el);
            let listeners: Vec<Listener> = el
                .node
                .listeners
                .borrow()
                .iter()
                .filter(|registration| registration.kind == event.kind())
                .map(|registration| Rc::clone(&registration.listener))
                .collect();
            for listener in listeners {
                listener(event);
            }
            current = el.parent();
        }
    }

    /// Creates an event of `kind` targeted at this element and dispatches it.
    pub fn emit(&self, kind: &str) -> Event {
        let event = Event::new(kind, self.clone());
        self.dispatch_event(&event);
        event
    }

    /// Whether this is a form control carrying the `disabled` attribute.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self.tag_name(), "button" | "input" | "select" | "textarea")
            && self.has_attribute("disabled")
    }

    /// Simulates a user click. Disabled form controls receive no event.
    pub fn click(&self) -> Event {
        if self.is_disabled() {
            return Event::new("click", self.clone());
        }
        self.emit("click")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn tree() -> Element {
        Element::from_html(
            r#"<div id="root"><ul class="list"><li class="item a">one</li><li class="item">two</li></ul><p>tail</p></div>"#,
        )
        .unwrap()
    }

    #[test]
    fn attribute_and_class_mutation() {
        let el = Element::new("DIV");
        assert_eq!(el.tag_name(), "div");
        el.add_class("a");
        el.add_class("b");
        el.add_class("a");
        assert_eq!(el.class_list(), vec!["a", "b"]);
        el.remove_class("a");
        assert_eq!(el.attribute("class").as_deref(), Some("b"));
        assert!(el.remove_attribute("class"));
        assert!(!el.remove_attribute("class"));
    }

    #[test]
    fn style_properties_round_trip_through_attribute() {
        let el = Element::new("div");
        el.set_style_property("display", "none");
        el.set_style_property("color", "red");
        assert_eq!(el.style_property("display").as_deref(), Some("none"));
        el.remove_style_property("display");
        assert_eq!(el.attribute("style").as_deref(), Some("color: red;"));
        el.remove_style_property("color");
        assert!(!el.has_attribute("style"));
    }

    #[test]
    fn append_moves_element_between_parents() {
        let root = tree();
        let p = root.query_selector("p").unwrap().unwrap();
        let list = root.query_selector(".list").unwrap().unwrap();
        list.append_child(&p).unwrap();
        assert_eq!(p.parent(), Some(list.clone()));
        assert_eq!(root.children().len(), 1);
        assert!(root.append_child(&root).is_err());
        assert!(list.append_child(&root).is_err());
    }

    #[test]
    fn insert_before_requires_parent() {
        let lonely = Element::new("span");
        let err = lonely.insert_before_self(&Element::new("b")).unwrap_err();
        assert!(err.is_not_found());

        let root = tree();
        let p = root.query_selector("p").unwrap().unwrap();
        let header = Element::new("header");
        p.insert_before_self(&header).unwrap();
        let tags: Vec<_> = root.children().iter().map(|c| c.tag_name().to_string()).collect();
        assert_eq!(tags, vec!["ul", "header", "p"]);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let root = tree();
        assert_eq!(root.text_content(), "onetwotail");
        root.set_text_content("flat");
        assert!(root.children().is_empty());
        assert_eq!(root.inner_html(), "flat");
    }

    #[test]
    fn events_bubble_and_stop() {
        let root = tree();
        let li = root.query_selector("li").unwrap().unwrap();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        root.add_event_listener("click", Rc::new(move |_: &Event| counter.set(counter.get() + 1)));
        let counter = Rc::clone(&hits);
        let id = li.add_event_listener(
            "click",
            Rc::new(move |event: &Event| {
                counter.set(counter.get() + 10);
                event.stop_propagation();
            }),
        );

        li.click();
        assert_eq!(hits.get(), 10);

        assert!(li.remove_event_listener(id));
        li.click();
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn disabled_controls_ignore_clicks() {
        let button = Element::new("button");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        button.add_event_listener("click", Rc::new(move |_: &Event| counter.set(counter.get() + 1)));

        button.set_attribute("disabled", "");
        assert!(button.is_disabled());
        button.click();
        assert_eq!(hits.get(), 0);

        button.remove_attribute("disabled");
        button.click();
        assert_eq!(hits.get(), 1);

        let div = Element::new("div");
        div.set_attribute("disabled", "");
        assert!(!div.is_disabled());
    }

    #[test]
    fn closest_includes_self() {
        let root = tree();
        let li = root.query_selector(".a").unwrap().unwrap();
        assert_eq!(li.closest("li").unwrap(), Some(li.clone()));
        assert_eq!(li.closest("#root").unwrap(), Some(root.clone()));
        assert_eq!(li.closest("a").unwrap(), None);
    }
}
