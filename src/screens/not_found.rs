//! Fallback for paths without a route.

use crate::app::{AppContext, ComponentBase, Screen, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::services::html_to_element;

const TEMPLATE: &str = r#"<section class="not-found">
  <h1>404</h1>
  <p>Page not found</p>
  <a href="/">Go home</a>
</section>"#;

pub struct NotFound {
    base: ComponentBase,
}

impl NotFound {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let screen = Self {
            base: ComponentBase::new("not-found"),
        };
        ctx.set_title(screen.title());
        screen
    }
}

impl Screen for NotFound {
    fn title(&self) -> &str {
        "Not found"
    }
}

impl View for NotFound {
    fn render(&mut self) -> Result<Element> {
        let root = html_to_element(TEMPLATE)?;
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
