//! Card-to-card transfer form.

use std::rc::{Rc, Weak};

use super::actions::{parse_amount, LOGIN_REQUIRED};
use super::Panel;
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::{Element, Event};
use crate::domain::error::{AppError, Result};
use crate::domain::models::TransferRequest;
use crate::query::Query;
use crate::services::{render_template, Signal};
use crate::ui::components::button::{reset, set_busy};
use crate::ui::components::{Button, ButtonVariant, Field, FieldKind};

const SEND: &str = "Send";

const TEMPLATE: &str = r#"<div class="transfer-field">
  <div id="transfer-card"><component-card-number></component-card-number></div>
  <div id="transfer-amount"></div>
  <component-send></component-send>
</div>"#;

pub struct TransferField {
    base: ComponentBase,
    panel: Rc<Panel>,
}

impl TransferField {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let base = ComponentBase::new("transfer-field");
        let panel = Panel::new(ctx, &base);
        Self { base, panel }
    }
}

fn handle_transfer(panel: &Rc<Panel>, event: &Event) -> Result<()> {
    event.prevent_default();
    if event.target().is_disabled() {
        return Ok(());
    }
    let ctx = panel.ctx();
    let Some(user) = ctx.session.user() else {
        ctx.notify_error(&AppError::Api(LOGIN_REQUIRED.to_string()));
        return Ok(());
    };

    let card_input = panel.find(r#"input[name="card-number"]"#)?;
    let amount_input = panel.find(r#"input[name="transfer-amount"]"#)?;
    let to_card_number = card_input.value()?.replace('-', "");

    let Some(amount) = parse_amount(&amount_input.value()?) else {
        ctx.validation
            .show_error(&panel.find("#transfer-amount label")?, None);
        return Ok(());
    };
    if to_card_number.is_empty() {
        ctx.validation
            .show_error(&panel.find("#transfer-card label")?, None);
        return Ok(());
    }

    let button = event.target().clone();
    set_busy(&button, "Sending...");
    let request = TransferRequest {
        amount,
        from_card_number: user.card.number.clone(),
        to_card_number,
    };
    let _span = tracing::debug_span!("transfer", amount, to = %request.to_card_number).entered();

    let weak: Weak<Panel> = Rc::downgrade(panel);
    ctx.services.cards.transfer(
        request,
        panel.token(),
        Box::new(move |result: Result<()>| {
            reset(&button, SEND);
            let Some(panel) = weak.upgrade() else {
                return;
            };
            let outcome = result.and_then(|()| {
                card_input.set_value("")?;
                amount_input.set_value("")?;
                let ctx = panel.ctx();
                ctx.notify_success("Transfer completed");
                ctx.bus.publish(Signal::TransactionCompleted);
                ctx.bus.publish(Signal::BalanceUpdated);
                Ok(())
            });
            if let Err(err) = outcome {
                panel.report(&err);
            }
        }),
    );
    Ok(())
}

impl View for TransferField {
    fn render(&mut self) -> Result<Element> {
        let card = self.base.mount_child(Box::new(
            Field::new("card-number", "xxxx-xxxx-xxxx-xxxx").kind(FieldKind::CreditCard),
        ))?;
        let weak = Rc::downgrade(&self.panel);
        let send = self.base.mount_child(Box::new(
            Button::new(SEND, ButtonVariant::Purple).on_click(move |event: &Event| {
                let Some(panel) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = handle_transfer(&panel, event) {
                    tracing::error!(error = %err, "Transfer failed");
                }
            }),
        ))?;
        let root = render_template(TEMPLATE, &[("card-number", card), ("send", send)])?;

        let amount = self.base.mount_child(Box::new(
            Field::new("transfer-amount", "Enter amount:").kind(FieldKind::Number),
        ))?;
        Query::new(root.clone()).find("#transfer-amount")?.append(&amount)?;

        self.panel.set_element(&root);
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
