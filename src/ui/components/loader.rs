//! Placeholder shown while a component waits for its data.

use crate::app::View;
use crate::dom::Element;
use crate::domain::error::Result;

/// Selector matching a rendered [`Loader`].
pub const LOADER_SELECTOR: &str = ".loader";

#[derive(Debug, Default)]
pub struct Loader;

impl View for Loader {
    fn render(&mut self) -> Result<Element> {
        let element = Element::new("div");
        element.add_class("loader");
        element.set_attribute("aria-busy", "true");
        Ok(element)
    }

    fn teardown(&mut self) {}
}

/// Removes a loader left inside `container`, if any.
pub fn remove_loader(container: &Element) {
    if let Ok(Some(loader)) = container.query_selector(LOADER_SELECTOR) {
        loader.remove();
    }
}
