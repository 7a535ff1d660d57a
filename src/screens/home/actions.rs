//! Top-up and withdrawal form.

use std::rc::{Rc, Weak};

use super::Panel;
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::{Element, Event};
use crate::domain::error::{AppError, Result};
use crate::domain::models::BalanceAction;
use crate::query::Query;
use crate::services::{render_template, Signal};
use crate::ui::components::button::{reset, set_busy};
use crate::ui::components::{Button, ButtonVariant, Field, FieldKind};

const TEMPLATE: &str = r#"<div class="actions">
  <component-field></component-field>
  <div id="action-buttons"></div>
</div>"#;

/// Message shown when an action is attempted without a session.
pub const LOGIN_REQUIRED: &str = "You need to be logged in";

pub struct Actions {
    base: ComponentBase,
    panel: Rc<Panel>,
}

impl Actions {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let base = ComponentBase::new("actions");
        let panel = Panel::new(ctx, &base);
        Self { base, panel }
    }
}

const fn button_label(action: BalanceAction) -> &'static str {
    match action {
        BalanceAction::TopUp => "Top-up",
        BalanceAction::Withdrawal => "Withdrawal",
    }
}

/// Parses a form amount, rejecting empty and non-positive input.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

fn update_balance(panel: &Rc<Panel>, event: &Event, action: BalanceAction) -> Result<()> {
    event.prevent_default();
    if event.target().is_disabled() {
        return Ok(());
    }
    let ctx = panel.ctx();
    if !ctx.session.is_authenticated() {
        ctx.notify_error(&AppError::Api(LOGIN_REQUIRED.to_string()));
        return Ok(());
    }

    let input = panel.find("input")?;
    let Some(amount) = parse_amount(&input.value()?) else {
        ctx.validation.show_error(&panel.find("label")?, None);
        return Ok(());
    };

    let button = event.target().clone();
    set_busy(&button, "Sending...");
    let _span = tracing::debug_span!("update_balance", %action, amount).entered();

    let weak: Weak<Panel> = Rc::downgrade(panel);
    ctx.services.cards.update_balance(
        amount,
        action,
        panel.token(),
        Box::new(move |result: Result<()>| {
            reset(&button, button_label(action));
            let Some(panel) = weak.upgrade() else {
                return;
            };
            let outcome = result.and_then(|()| {
                input.set_value("")?;
                panel.ctx().notify_success("Balance updated");
                panel.ctx().bus.publish(Signal::BalanceUpdated);
                Ok(())
            });
            if let Err(err) = outcome {
                panel.report(&err);
            }
        }),
    );
    Ok(())
}

impl View for Actions {
    fn render(&mut self) -> Result<Element> {
        let field = self.base.mount_child(Box::new(
            Field::new("amount", "Enter amount:").kind(FieldKind::Number),
        ))?;
        let root = render_template(TEMPLATE, &[("field", field)])?;
        self.panel.set_element(&root);

        let buttons = Query::new(root.clone()).find("#action-buttons")?;
        for (action, variant) in [
            (BalanceAction::TopUp, ButtonVariant::Green),
            (BalanceAction::Withdrawal, ButtonVariant::Purple),
        ] {
            let weak = Rc::downgrade(&self.panel);
            let button = Button::new(button_label(action), variant).on_click(move |event: &Event| {
                let Some(panel) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = update_balance(&panel, event, action) {
                    tracing::error!(error = %err, %action, "Balance update failed");
                }
            });
            buttons.append(&self.base.mount_child(Box::new(button))?)?;
        }

        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
