//! Persistent layout shell.
//!
//! Built once around the first routed view and kept for the lifetime of the
//! router. Only the `.content` region changes on navigation.
//!
//! ```text
//! div.layout
//! ├── div#notification
//! ├── header.header        (inserted before main)
//! └── main.main
//!     └── div.content      (routed view)
//! ```

use super::components::Header;
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::query::Query;
use crate::services::html_to_element;

const TEMPLATE: &str = r#"<div class="layout">
  <div id="notification" class="notification"></div>
  <main class="main"><div class="content"></div></main>
</div>"#;

pub struct Layout {
    base: ComponentBase,
    ctx: AppContext,
    content: Option<Element>,
}

impl Layout {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            base: ComponentBase::new("layout"),
            ctx: ctx.clone(),
            content: None,
        }
    }

    /// Builds the shell with `view` in its content region.
    ///
    /// # Errors
    ///
    /// Propagates template and header render errors.
    pub fn render(&mut self, view: &Element) -> Result<Element> {
        let root = Query::new(html_to_element(TEMPLATE)?);
        let header = self.base.mount_child(Box::new(Header::new(&self.ctx)))?;
        root.find("main")?.before(&header)?;

        let content = root.find(".content")?;
        content.append(view)?;
        self.content = Some(content.into_element());

        let root = root.into_element();
        self.base.rendered(&root);
        Ok(root)
    }

    #[must_use]
    pub fn element(&self) -> Option<&Element> {
        self.base.element()
    }

    /// The `.content` region.
    #[must_use]
    pub fn content_slot(&self) -> Option<Element> {
        self.content.clone()
    }

    pub fn teardown(&mut self) {
        self.base.teardown();
    }
}
