//! Contact list with the money transfer form.

use std::rc::{Rc, Weak};

use super::{show_loader, Panel, TransferField};
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::domain::models::UserProfile;
use crate::query::Query;
use crate::services::render_template;
use crate::ui::components::{remove_loader, Heading, UserAction, UserItem};
use crate::utils::format_card_number_with_dashes;

const TEMPLATE: &str = r#"<div class="contacts">
  <component-heading></component-heading>
  <div id="contacts-list"></div>
  <component-transfer-field></component-transfer-field>
</div>"#;

pub struct Contacts {
    base: ComponentBase,
    panel: Rc<Panel>,
}

impl Contacts {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let base = ComponentBase::new("contacts");
        let panel = Panel::new(ctx, &base);
        Self { base, panel }
    }
}

fn fetch(panel: &Rc<Panel>) {
    let weak: Weak<Panel> = Rc::downgrade(panel);
    panel.ctx().services.users.get_all(
        None,
        panel.token(),
        Box::new(move |result: Result<Vec<UserProfile>>| {
            let Some(panel) = weak.upgrade() else {
                return;
            };
            if let Err(err) = result.and_then(|users| show(&panel, users)) {
                panel.report(&err);
            }
        }),
    );
}

fn show(panel: &Rc<Panel>, users: Vec<UserProfile>) -> Result<()> {
    let list = panel.find("#contacts-list")?;
    remove_loader(list.element());
    for user in users {
        let weak = Rc::downgrade(panel);
        let pick: UserAction = Rc::new(move |user: &UserProfile| {
            if let Some(panel) = weak.upgrade() {
                fill_card_number(&panel, user);
            }
        });
        let item = UserItem::new(user, true).on_click(pick).render()?;
        list.append(&item)?;
    }
    for item in list.find_all("button") {
        item.add_class("fade-in");
    }
    Ok(())
}

fn fill_card_number(panel: &Panel, user: &UserProfile) {
    let outcome = Query::select(panel.ctx().document(), r#"input[name="card-number"]"#)
        .and_then(|field| {
            field.set_value(&format_card_number_with_dashes(&user.card.number))?;
            Ok(())
        });
    if let Err(err) = outcome {
        tracing::warn!(error = %err, user = user.id, "Could not fill card number");
    }
}

impl View for Contacts {
    fn render(&mut self) -> Result<Element> {
        let heading = self
            .base
            .mount_child(Box::new(Heading::new("Transfer money")))?;
        let transfer = self
            .base
            .mount_child(Box::new(TransferField::new(self.panel.ctx())))?;
        let root = render_template(
            TEMPLATE,
            &[("heading", heading), ("transfer-field", transfer)],
        )?;
        self.panel.set_element(&root);
        show_loader(&self.panel.find("#contacts-list")?)?;
        Panel::fetch_after_delay(&self.panel, fetch);
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
