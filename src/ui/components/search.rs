//! Debounced contact search in the header.
//!
//! Typing schedules a lookup after the configured quiet period. Results are
//! rendered as [`UserItem`]s; clicking one copies the contact's card number
//! into the transfer form (when it is on screen) and clears the search.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::user_item::{UserAction, UserItem};
use crate::api::CancellationToken;
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::{Element, Event};
use crate::domain::error::{AppError, Result};
use crate::domain::models::UserProfile;
use crate::query::{InputOptions, Query};
use crate::services::html_to_element;
use crate::utils::{format_card_number_with_dashes, Debouncer};

/// Maximum number of results shown.
pub const MAX_RESULTS: usize = 5;

const TEMPLATE: &str = r#"<div class="search"><input><div id="search-results"></div></div>"#;

struct SearchShared {
    ctx: AppContext,
    token: CancellationToken,
    debouncer: Debouncer,
    element: RefCell<Option<Element>>,
}

impl SearchShared {
    fn parts(&self) -> Result<(Query, Query)> {
        let root = self
            .element
            .borrow()
            .clone()
            .map(Query::new)
            .ok_or_else(|| AppError::NotFound(".search".to_string()))?;
        Ok((root.find("input")?, root.find("#search-results")?))
    }

    fn clear(&self) -> Result<()> {
        let (input, results) = self.parts()?;
        input.set_value("")?;
        results.set_html("");
        Ok(())
    }

    fn search(shared: &Rc<Self>, term: String) -> Result<()> {
        let (_, results) = shared.parts()?;
        if term.trim().is_empty() {
            results.set_html("");
            return Ok(());
        }
        let _span = tracing::debug_span!("search", term = %term).entered();
        let weak = Rc::downgrade(shared);
        shared.ctx.services.users.get_all(
            Some(term),
            &shared.token,
            Box::new(move |result: Result<Vec<UserProfile>>| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let outcome = result.and_then(|users| Self::show(&shared, users));
                if let Err(err) = outcome {
                    shared.ctx.notify_error(&err);
                }
            }),
        );
        Ok(())
    }

    fn show(shared: &Rc<Self>, users: Vec<UserProfile>) -> Result<()> {
        let (_, results) = shared.parts()?;
        results.set_html("");
        for (user, index) in users.into_iter().take(MAX_RESULTS).zip(0_u32..) {
            let weak = Rc::downgrade(shared);
            let pick: UserAction = Rc::new(move |user: &UserProfile| {
                if let Some(shared) = weak.upgrade() {
                    shared.pick(user);
                }
            });
            let item = UserItem::new(user, true).on_click(pick).render()?;
            Query::new(item.clone())
                .add_class("search-item")
                .css("transition-delay", &format!("{:.1}s", f64::from(index) * 0.1));
            results.append(&item)?;
        }
        Ok(())
    }

    fn pick(&self, user: &UserProfile) {
        match Query::select(self.ctx.document(), r#"input[name="card-number"]"#) {
            Ok(field) => {
                if let Err(err) = field.set_value(&format_card_number_with_dashes(&user.card.number)) {
                    tracing::warn!(error = %err, "Card number field rejected value");
                }
            }
            Err(err) => tracing::debug!(error = %err, "No transfer form on screen"),
        }
        if let Err(err) = self.clear() {
            tracing::warn!(error = %err, "Failed to clear search");
        }
    }
}

pub struct Search {
    base: ComponentBase,
    shared: Rc<SearchShared>,
}

impl Search {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let base = ComponentBase::new("search");
        let debouncer = Debouncer::new(ctx.scheduler(), ctx.config.search_debounce());
        let shared = Rc::new(SearchShared {
            ctx: ctx.clone(),
            token: base.token().clone(),
            debouncer,
            element: RefCell::new(None),
        });
        Self { base, shared }
    }

    fn on_input(weak: &Weak<SearchShared>, event: &Event) {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let term = event.target().value();
        let pending = Rc::downgrade(&shared);
        shared.debouncer.call(move || {
            if let Some(shared) = pending.upgrade() {
                if let Err(err) = SearchShared::search(&shared, term) {
                    tracing::error!(error = %err, "Search failed");
                }
            }
        });
    }
}

impl View for Search {
    fn render(&mut self) -> Result<Element> {
        let root = html_to_element(TEMPLATE)?;
        let weak = Rc::downgrade(&self.shared);
        Query::new(root.clone()).find("input")?.input(
            InputOptions::new()
                .attr("type", "search")
                .attr("name", "search")
                .attr("placeholder", "Search contacts...")
                .on_input(move |event: &Event| Search::on_input(&weak, event)),
        )?;
        *self.shared.element.borrow_mut() = Some(root.clone());
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        if self.base.teardown() {
            self.shared.debouncer.cancel();
        }
    }
}
