//! The signed-in user's card.

use std::rc::{Rc, Weak};

use super::{show_loader, Panel};
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::domain::models::Card;
use crate::services::{render_template, Signal};
use crate::ui::components::{remove_loader, Heading};
use crate::utils::{format_card_number_with_dashes, format_to_currency};

const TEMPLATE: &str = r#"<div class="card-info">
  <component-heading></component-heading>
  <div id="card"></div>
</div>"#;

pub struct CardInfo {
    base: ComponentBase,
    panel: Rc<Panel>,
}

impl CardInfo {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let mut base = ComponentBase::new("card-info");
        let panel = Panel::new(ctx, &base);
        Panel::refetch_on(&panel, &mut base, Signal::BalanceUpdated, fetch);
        Self { base, panel }
    }
}

fn fetch(panel: &Rc<Panel>) {
    let weak: Weak<Panel> = Rc::downgrade(panel);
    panel.ctx().services.cards.by_user(
        panel.token(),
        Box::new(move |result: Result<Card>| {
            let Some(panel) = weak.upgrade() else {
                return;
            };
            if let Err(err) = result.and_then(|card| show(&panel, &card)) {
                panel.report(&err);
            }
        }),
    );
}

fn show(panel: &Panel, card: &Card) -> Result<()> {
    let container = panel.find("#card")?;
    remove_loader(container.element());
    container.set_html("");
    for (class, text) in [
        ("number", format_card_number_with_dashes(&card.number)),
        ("balance", format_to_currency(card.balance)),
        ("expire-date", card.expire_date.clone()),
    ] {
        let row = Element::new("div");
        row.add_class(class);
        row.set_text_content(&text);
        container.append(&row)?;
    }
    Ok(())
}

impl View for CardInfo {
    fn render(&mut self) -> Result<Element> {
        let heading = self.base.mount_child(Box::new(Heading::new("Your card")))?;
        let root = render_template(TEMPLATE, &[("heading", heading)])?;
        self.panel.set_element(&root);
        show_loader(&self.panel.find("#card")?)?;
        Panel::fetch_after_delay(&self.panel, fetch);
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
