//! Static about page.

use crate::app::{AppContext, ComponentBase, Screen, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::services::html_to_element;

const TEMPLATE: &str = r#"<section class="about">
  <h1>About Red Bank</h1>
  <p>Red Bank is a demo bank: check your balance, top up your card and send money to your contacts.</p>
  <a href="/">Back to dashboard</a>
</section>"#;

pub struct About {
    base: ComponentBase,
}

impl About {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let about = Self {
            base: ComponentBase::new("about"),
        };
        ctx.set_title(about.title());
        about
    }
}

impl Screen for About {
    fn title(&self) -> &str {
        "About"
    }
}

impl View for About {
    fn render(&mut self) -> Result<Element> {
        let root = html_to_element(TEMPLATE)?;
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
