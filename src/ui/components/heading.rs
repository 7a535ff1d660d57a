//! Section heading.

use crate::app::View;
use crate::dom::Element;
use crate::domain::error::Result;

pub struct Heading {
    title: String,
}

impl Heading {
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

impl View for Heading {
    fn render(&mut self) -> Result<Element> {
        let element = Element::new("h1");
        element.add_class("heading");
        element.set_text_content(&self.title);
        Ok(element)
    }

    fn teardown(&mut self) {}
}
