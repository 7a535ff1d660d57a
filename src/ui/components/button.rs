//! Clickable button with a color variant.

use std::rc::Rc;

use crate::app::View;
use crate::dom::{Element, Event, Listener};
use crate::domain::error::Result;

/// Color variant of a [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    Green,
    Purple,
}

impl ButtonVariant {
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Green => "button--green",
            Self::Purple => "button--purple",
        }
    }
}

pub struct Button {
    label: String,
    variant: ButtonVariant,
    on_click: Option<Listener>,
}

impl Button {
    #[must_use]
    pub fn new(label: &str, variant: ButtonVariant) -> Self {
        Self {
            label: label.to_string(),
            variant,
            on_click: None,
        }
    }

    #[must_use]
    pub fn on_click(mut self, listener: impl Fn(&Event) + 'static) -> Self {
        self.on_click = Some(Rc::new(listener));
        self
    }
}

impl View for Button {
    fn render(&mut self) -> Result<Element> {
        let element = Element::new("button");
        element.add_class("button");
        element.add_class(self.variant.class_name());
        element.set_text_content(&self.label);
        if let Some(listener) = &self.on_click {
            element.add_event_listener("click", Rc::clone(listener));
        }
        Ok(element)
    }

    fn teardown(&mut self) {
        self.on_click = None;
    }
}

/// Puts a button into its busy state.
pub fn set_busy(button: &Element, label: &str) {
    button.set_text_content(label);
    button.set_attribute("disabled", "true");
}

/// Restores a button after [`set_busy`].
pub fn reset(button: &Element, label: &str) {
    button.remove_attribute("disabled");
    button.set_text_content(label);
}
