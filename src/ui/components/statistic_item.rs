//! Labelled statistic value.

use super::button::ButtonVariant;
use crate::app::View;
use crate::dom::Element;
use crate::domain::error::Result;

pub struct StatisticItem {
    label: String,
    value: String,
    variant: ButtonVariant,
}

impl StatisticItem {
    #[must_use]
    pub fn new(label: &str, value: &str, variant: ButtonVariant) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            variant,
        }
    }
}

impl View for StatisticItem {
    fn render(&mut self) -> Result<Element> {
        let root = Element::new("div");
        root.add_class("statistic-item");
        root.add_class(match self.variant {
            ButtonVariant::Green => "statistic-item--green",
            ButtonVariant::Purple => "statistic-item--purple",
        });
        let label = Element::new("span");
        label.add_class("label");
        label.set_text_content(&self.label);
        let value = Element::new("span");
        value.add_class("value");
        value.set_text_content(&self.value);
        root.append_child(&label)?;
        root.append_child(&value)?;
        Ok(root)
    }

    fn teardown(&mut self) {}
}
