//! Labelled form input.
//!
//! The rendered root is a `<label class="field">` wrapping the `<input>`, so
//! the validation service can flag the label while the input keeps focus.

use crate::app::View;
use crate::dom::Element;
use crate::domain::error::Result;
use crate::query::{InputOptions, Query};

/// Input behavior of a [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    /// Digits only.
    Number,
    /// Dashed 16-digit card number.
    CreditCard,
}

#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    placeholder: String,
    kind: FieldKind,
    limit: Option<usize>,
}

impl Field {
    #[must_use]
    pub fn new(name: &str, placeholder: &str) -> Self {
        Self {
            name: name.to_string(),
            placeholder: placeholder.to_string(),
            kind: FieldKind::Text,
            limit: None,
        }
    }

    #[must_use]
    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Maximum number of digits accepted by a [`FieldKind::Number`] field.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl View for Field {
    fn render(&mut self) -> Result<Element> {
        let label = Element::new("label");
        label.add_class("field");
        let input = Query::new(Element::new("input"));
        let input_type = match self.kind {
            FieldKind::Number => "number",
            FieldKind::Text | FieldKind::CreditCard => "text",
        };
        input.input(
            InputOptions::new()
                .attr("type", input_type)
                .attr("name", &self.name)
                .attr("placeholder", &self.placeholder),
        )?;
        match self.kind {
            FieldKind::Number => {
                input.number_input(self.limit)?;
            }
            FieldKind::CreditCard => {
                input.credit_card_input()?;
            }
            FieldKind::Text => {}
        }
        label.append_child(input.element())?;
        Ok(label)
    }

    fn teardown(&mut self) {}
}
