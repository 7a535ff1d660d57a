//! Recent transactions of the signed-in user.

use std::rc::{Rc, Weak};

use super::{show_loader, Panel};
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::domain::models::TransactionPage;
use crate::services::{render_template, Signal};
use crate::ui::components::{remove_loader, Heading, TransactionItem};

/// Text shown when the user has no transactions.
pub const EMPTY_MESSAGE: &str = "Transactions not found!";

const TEMPLATE: &str = r#"<div class="transactions">
  <component-heading></component-heading>
  <div id="transactions-list"></div>
</div>"#;

pub struct Transactions {
    base: ComponentBase,
    panel: Rc<Panel>,
}

impl Transactions {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let mut base = ComponentBase::new("transactions");
        let panel = Panel::new(ctx, &base);
        Panel::refetch_on(&panel, &mut base, Signal::TransactionCompleted, fetch);
        Self { base, panel }
    }
}

fn fetch(panel: &Rc<Panel>) {
    let weak: Weak<Panel> = Rc::downgrade(panel);
    panel.ctx().services.transactions.get_all(
        panel.token(),
        Box::new(move |result: Result<TransactionPage>| {
            let Some(panel) = weak.upgrade() else {
                return;
            };
            if let Err(err) = result.and_then(|page| show(&panel, page)) {
                panel.report(&err);
            }
        }),
    );
}

fn show(panel: &Panel, page: TransactionPage) -> Result<()> {
    let list = panel.find("#transactions-list")?;
    remove_loader(list.element());
    list.set_text("");
    if page.transactions.is_empty() {
        list.set_text(EMPTY_MESSAGE);
        return Ok(());
    }
    for transaction in page.transactions {
        list.append(&TransactionItem::new(transaction).render()?)?;
    }
    Ok(())
}

impl View for Transactions {
    fn render(&mut self) -> Result<Element> {
        let heading = self
            .base
            .mount_child(Box::new(Heading::new("Recent transactions")))?;
        let root = render_template(TEMPLATE, &[("heading", heading)])?;
        self.panel.set_element(&root);
        show_loader(&self.panel.find("#transactions-list")?)?;
        Panel::fetch_after_delay(&self.panel, fetch);
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
