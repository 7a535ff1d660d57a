//! Page header: logo, contact search, navigation and the signed-in user.

use super::search::Search;
use super::user_item::UserItem;
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::query::Query;
use crate::services::render_template;

const TEMPLATE: &str = r#"<header class="header">
  <a href="/" class="logo">Red Bank</a>
  <component-search></component-search>
  <nav class="menu">
    <a href="/" class="menu-item">Home</a>
    <a href="/about" class="menu-item">About us</a>
  </nav>
  <div class="right-side"></div>
</header>"#;

pub struct Header {
    base: ComponentBase,
    ctx: AppContext,
}

impl Header {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            base: ComponentBase::new("header"),
            ctx: ctx.clone(),
        }
    }
}

impl View for Header {
    fn render(&mut self) -> Result<Element> {
        let search = self.base.mount_child(Box::new(Search::new(&self.ctx)))?;
        let root = render_template(TEMPLATE, &[("search", search)])?;

        if let Some(user) = self.ctx.session.user() {
            let badge = self
                .base
                .mount_child(Box::new(UserItem::new(user.clone(), false)))?;
            Query::new(root.clone()).find(".right-side")?.append(&badge)?;
        }

        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
