//! Chainable element query and mutation handle.
//!
//! [`Query`] wraps exactly one [`Element`] and is the only way components
//! touch the document. Lookups that find nothing fail loudly with
//! [`AppError::NotFound`]; form helpers check the element kind up front and
//! fail with [`AppError::TypeMismatch`] without mutating anything.
//!
//! Mutators return `&Self` so calls chain; fallible mutators return
//! `Result<&Self>` and chain through `?`.
//!
//! ```
//! use redbank::dom::Document;
//! use redbank::query::Query;
//!
//! let doc = Document::with_body(r#"<div id="notification"></div>"#);
//! let banner = Query::select(&doc, "#notification").unwrap();
//! banner.set_text("Saved").add_class("notification--success");
//! assert_eq!(banner.text(), "Saved");
//! ```

use std::rc::Rc;

use crate::dom::{Document, Element, Event, Listener};
use crate::domain::error::{AppError, Result};
use crate::utils::format_card_number;

/// One or several class names.
pub trait ClassNames {
    fn class_names(&self) -> Vec<&str>;
}

impl ClassNames for str {
    fn class_names(&self) -> Vec<&str> {
        vec![self]
    }
}

impl ClassNames for &str {
    fn class_names(&self) -> Vec<&str> {
        vec![*self]
    }
}

impl ClassNames for String {
    fn class_names(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl ClassNames for [&str] {
    fn class_names(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl<const N: usize> ClassNames for [&str; N] {
    fn class_names(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl ClassNames for Vec<&str> {
    fn class_names(&self) -> Vec<&str> {
        self.clone()
    }
}

impl ClassNames for Vec<String> {
    fn class_names(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

/// Attributes and input listener applied by [`Query::input`].
#[derive(Default)]
pub struct InputOptions {
    attrs: Vec<(String, String)>,
    on_input: Option<Listener>,
}

impl InputOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn on_input(mut self, listener: impl Fn(&Event) + 'static) -> Self {
        self.on_input = Some(Rc::new(listener));
        self
    }
}

/// Handle over a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    element: Element,
}

impl From<Element> for Query {
    fn from(element: Element) -> Self {
        Self { element }
    }
}

impl Query {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// First element in `document` matching `selector`.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when nothing matches; [`AppError::InvalidArgument`]
    /// for a malformed selector.
    pub fn select(document: &Document, selector: &str) -> Result<Self> {
        document
            .query_selector(selector)?
            .map(Self::new)
            .ok_or_else(|| AppError::NotFound(selector.to_string()))
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    #[must_use]
    pub fn into_element(self) -> Element {
        self.element
    }

    /// First descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when nothing matches.
    pub fn find(&self, selector: &str) -> Result<Self> {
        self.element
            .query_selector(selector)?
            .map(Self::new)
            .ok_or_else(|| AppError::NotFound(selector.to_string()))
    }

    /// Every descendant matching `selector`; empty when nothing matches or
    /// the selector is malformed.
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<Self> {
        match self.element.query_selector_all(selector) {
            Ok(found) => found.into_iter().map(Self::new).collect(),
            Err(err) => {
                tracing::warn!(selector, error = %err, "find_all with malformed selector");
                Vec::new()
            }
        }
    }

    #[must_use]
    pub fn html(&self) -> String {
        self.element.inner_html()
    }

    pub fn set_html(&self, markup: &str) -> &Self {
        self.element.set_inner_html(markup);
        self
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.element.text_content()
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.element.set_text_content(text);
        self
    }

    pub fn on(&self, kind: &str, listener: impl Fn(&Event) + 'static) -> &Self {
        self.element.add_event_listener(kind, Rc::new(listener));
        self
    }

    pub fn click(&self, listener: impl Fn(&Event) + 'static) -> &Self {
        self.on("click", listener)
    }

    fn describe(&self) -> String {
        match self.element.input_type() {
            Some(kind) => format!("input[type={kind}]"),
            None => self.element.tag_name().to_string(),
        }
    }

    fn require_tag(&self, tag: &str) -> Result<()> {
        if self.element.tag_name() == tag {
            Ok(())
        } else {
            Err(AppError::type_mismatch(tag, self.describe()))
        }
    }

    fn require_input_type(&self, kind: &str) -> Result<()> {
        if self.element.input_type().as_deref() == Some(kind) {
            Ok(())
        } else {
            Err(AppError::type_mismatch(format!("input[type={kind}]"), self.describe()))
        }
    }

    /// Calls `handler` on submit after preventing the default action.
    ///
    /// # Errors
    ///
    /// [`AppError::TypeMismatch`] unless the element is a `<form>`.
    pub fn submit(&self, handler: impl Fn(&Event) + 'static) -> Result<&Self> {
        self.require_tag("form")?;
        self.on("submit", move |event: &Event| {
            event.prevent_default();
            handler(event);
        });
        Ok(self)
    }

    /// Live value of an `<input>`.
    ///
    /// # Errors
    ///
    /// [`AppError::TypeMismatch`] unless the element is an `<input>`.
    pub fn value(&self) -> Result<String> {
        self.require_tag("input")?;
        Ok(self.element.value())
    }

    /// # Errors
    ///
    /// [`AppError::TypeMismatch`] unless the element is an `<input>`.
    pub fn set_value(&self, value: &str) -> Result<&Self> {
        self.require_tag("input")?;
        self.element.set_value(value);
        Ok(self)
    }

    /// Applies attributes and an optional `input` listener to an `<input>`.
    ///
    /// # Errors
    ///
    /// [`AppError::TypeMismatch`] unless the element is an `<input>`.
    pub fn input(&self, options: InputOptions) -> Result<&Self> {
        self.require_tag("input")?;
        for (name, value) in &options.attrs {
            self.element.set_attribute(name, value);
        }
        if let Some(listener) = options.on_input {
            self.element.add_event_listener("input", listener);
        }
        Ok(self)
    }

    /// Keeps only digits (at most `limit` of them) in a numeric input.
    ///
    /// # Errors
    ///
    /// [`AppError::TypeMismatch`] unless the element is `<input type="number">`.
    pub fn number_input(&self, limit: Option<usize>) -> Result<&Self> {
        self.require_input_type("number")?;
        self.on("input", move |event: &Event| {
            let target = event.target();
            let digits: String = target
                .value()
                .chars()
                .filter(char::is_ascii_digit)
                .take(limit.unwrap_or(usize::MAX))
                .collect();
            target.set_value(&digits);
        });
        Ok(self)
    }

    /// Formats typed input as a dashed 16-digit card number.
    ///
    /// # Errors
    ///
    /// [`AppError::TypeMismatch`] unless the element is `<input type="text">`.
    pub fn credit_card_input(&self) -> Result<&Self> {
        self.require_input_type("text")?;
        self.on("input", |event: &Event| {
            let target = event.target();
            target.set_value(&format_card_number(&target.value()));
        });
        Ok(self)
    }

    /// Removes an inline `display` override.
    pub fn show(&self) -> &Self {
        self.element.remove_style_property("display");
        self
    }

    pub fn hide(&self) -> &Self {
        self.element.set_style_property("display", "none");
        self
    }

    pub fn css(&self, property: &str, value: &str) -> &Self {
        self.element.set_style_property(property, value);
        self
    }

    pub fn add_class<C: ClassNames + ?Sized>(&self, classes: &C) -> &Self {
        for class in classes.class_names() {
            self.element.add_class(class);
        }
        self
    }

    pub fn remove_class<C: ClassNames + ?Sized>(&self, classes: &C) -> &Self {
        for class in classes.class_names() {
            self.element.remove_class(class);
        }
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.element.has_class(class)
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.element.attribute(name)
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        self.element.set_attribute(name, value);
        self
    }

    pub fn remove_attr(&self, name: &str) -> &Self {
        self.element.remove_attribute(name);
        self
    }

    /// # Errors
    ///
    /// [`AppError::InvalidArgument`] when `child` is an ancestor of this
    /// element.
    pub fn append(&self, child: &Element) -> Result<&Self> {
        self.element.append_child(child)?;
        Ok(self)
    }

    /// Inserts `new` as the previous sibling of this element.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when this element has no parent.
    pub fn before(&self, new: &Element) -> Result<&Self> {
        self.element.insert_before_self(new)?;
        Ok(self)
    }
}
