//! The dashboard screen and its child components.
//!
//! # Components
//!
//! - [`card_info`]: Card number and balance, refreshed on `BalanceUpdated`
//! - [`actions`]: Top-up and withdrawal form
//! - [`contacts`]: Contact list and the [`transfer_field`] form
//! - [`statistics`]: Income/expense totals, refreshed on `TransactionCompleted`
//! - [`transactions`]: Recent transactions, refreshed on `TransactionCompleted`
//!
//! Components that fetch data render a [`Loader`] first and start fetching
//! once the configured render delay has passed. Their listeners and signal
//! handlers only hold [`Weak`] references to the component's [`Panel`], so
//! a handler that fires after the component is gone does nothing.

pub mod actions;
pub mod card_info;
pub mod contacts;
pub mod statistics;
pub mod transactions;
pub mod transfer_field;

pub use actions::Actions;
pub use card_info::CardInfo;
pub use contacts::Contacts;
pub use statistics::Statistics;
pub use transactions::Transactions;
pub use transfer_field::TransferField;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::api::CancellationToken;
use crate::app::{AppContext, ComponentBase, Screen, View};
use crate::dom::Element;
use crate::domain::error::{AppError, Result};
use crate::query::Query;
use crate::services::{html_to_element, render_template, Signal};
use crate::ui::components::Loader;

/// State shared between a component and its deferred callbacks.
pub struct Panel {
    ctx: AppContext,
    token: CancellationToken,
    name: &'static str,
    element: RefCell<Option<Element>>,
}

impl Panel {
    #[must_use]
    pub fn new(ctx: &AppContext, base: &ComponentBase) -> Rc<Self> {
        Rc::new(Self {
            ctx: ctx.clone(),
            token: base.token().clone(),
            name: base.name(),
            element: RefCell::new(None),
        })
    }

    #[must_use]
    pub const fn ctx(&self) -> &AppContext {
        &self.ctx
    }

    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether the owning component is still mounted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn set_element(&self, element: &Element) {
        *self.element.borrow_mut() = Some(element.clone());
    }

    /// Root of the rendered component.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] before the component has rendered.
    pub fn root(&self) -> Result<Query> {
        self.element
            .borrow()
            .clone()
            .map(Query::new)
            .ok_or_else(|| AppError::NotFound(format!("{} root", self.name)))
    }

    /// # Errors
    ///
    /// [`AppError::NotFound`] when `selector` matches nothing inside the
    /// component.
    pub fn find(&self, selector: &str) -> Result<Query> {
        self.root()?.find(selector)
    }

    /// Runs `fetch` after the render delay unless the component is torn
    /// down first.
    pub fn fetch_after_delay(panel: &Rc<Self>, fetch: fn(&Rc<Self>)) {
        let weak = Rc::downgrade(panel);
        panel
            .ctx
            .scheduler()
            .set_timeout(panel.ctx.config.render_delay(), move || {
                if let Some(panel) = weak.upgrade().filter(|panel| panel.is_active()) {
                    fetch(&panel);
                }
            });
    }

    /// Re-runs `fetch` every time `signal` is published.
    pub fn refetch_on(panel: &Rc<Self>, base: &mut ComponentBase, signal: Signal, fetch: fn(&Rc<Self>)) {
        let weak: Weak<Self> = Rc::downgrade(panel);
        base.track(panel.ctx.bus.subscribe(signal, move || {
            if let Some(panel) = weak.upgrade().filter(|panel| panel.is_active()) {
                tracing::debug!(component = panel.name, %signal, "Refreshing");
                fetch(&panel);
            }
        }));
    }

    /// Surfaces a failed completion in the error banner. Failures that are
    /// not the collaborator's (DOM or I/O) are also logged.
    pub fn report(&self, error: &AppError) {
        if !matches!(error, AppError::Api(_) | AppError::InvalidArgument(_)) {
            tracing::error!(component = self.name, error = %error, "Failed to update view");
        }
        self.ctx.notify_error(error);
    }
}

/// Replaces the contents of `container` with a loader.
///
/// # Errors
///
/// Propagates DOM insertion errors.
pub fn show_loader(container: &Query) -> Result<()> {
    container.set_html("");
    container.append(&Loader.render()?)?;
    Ok(())
}

const TEMPLATE: &str = r#"<div class="home">
  <div class="column">
    <component-card-info></component-card-info>
    <component-actions></component-actions>
    <component-contacts></component-contacts>
  </div>
  <div class="column">
    <component-statistics></component-statistics>
    <component-transactions></component-transactions>
  </div>
</div>"#;

const AUTH_REQUIRED: &str = r#"<div class="home"><p class="auth-required">You need to be logged in to see this page</p></div>"#;

/// The dashboard.
pub struct Home {
    base: ComponentBase,
    ctx: AppContext,
}

impl Home {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let home = Self {
            base: ComponentBase::new("home"),
            ctx: ctx.clone(),
        };
        ctx.set_title(home.title());
        home
    }
}

impl Screen for Home {
    fn title(&self) -> &str {
        "Home"
    }
}

impl View for Home {
    fn render(&mut self) -> Result<Element> {
        let _span = tracing::debug_span!("render", screen = "home").entered();
        if !self.ctx.session.is_authenticated() {
            let root = html_to_element(AUTH_REQUIRED)?;
            self.base.rendered(&root);
            return Ok(root);
        }

        let ctx = &self.ctx;
        let children: [(&str, Box<dyn View>); 5] = [
            ("card-info", Box::new(CardInfo::new(ctx))),
            ("actions", Box::new(Actions::new(ctx))),
            ("contacts", Box::new(Contacts::new(ctx))),
            ("statistics", Box::new(Statistics::new(ctx))),
            ("transactions", Box::new(Transactions::new(ctx))),
        ];
        let mut slots = Vec::with_capacity(children.len());
        for (name, child) in children {
            slots.push((name, self.base.mount_child(child)?));
        }
        let root = render_template(TEMPLATE, &slots)?;
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
