//! Explicit application context handed to every view.
//!
//! Replaces ambient singletons: the window, configuration, read-only session,
//! signal bus, banner and collaborator services all travel together in one
//! cheaply clonable [`AppContext`].

use std::rc::Rc;

use crate::api::{CardService, MemoryBank, StatisticService, TransactionService, UserService};
use crate::browser::{Scheduler, Window};
use crate::dom::Document;
use crate::domain::error::AppError;
use crate::domain::models::UserProfile;
use crate::services::{NotificationKind, NotificationService, SignalBus, ValidationService};
use crate::Config;

/// Signed-in user, fixed for the lifetime of the context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<UserProfile>,
}

impl Session {
    #[must_use]
    pub const fn new(user: Option<UserProfile>) -> Self {
        Self { user }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Collaborator endpoints.
#[derive(Clone)]
pub struct Services {
    pub cards: Rc<dyn CardService>,
    pub users: Rc<dyn UserService>,
    pub transactions: Rc<dyn TransactionService>,
    pub statistics: Rc<dyn StatisticService>,
}

impl Services {
    /// Routes every service to one in-memory bank.
    #[must_use]
    pub fn from_bank(bank: &Rc<MemoryBank>) -> Self {
        Self {
            cards: Rc::clone(bank) as Rc<dyn CardService>,
            users: Rc::clone(bank) as Rc<dyn UserService>,
            transactions: Rc::clone(bank) as Rc<dyn TransactionService>,
            statistics: Rc::clone(bank) as Rc<dyn StatisticService>,
        }
    }
}

/// Everything a view may depend on.
#[derive(Clone)]
pub struct AppContext {
    pub window: Window,
    pub config: Rc<Config>,
    pub session: Rc<Session>,
    pub bus: SignalBus,
    pub notifications: Rc<NotificationService>,
    pub validation: Rc<ValidationService>,
    pub services: Services,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("window", &self.window)
            .field("session", &self.session)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    #[must_use]
    pub fn new(window: Window, config: Config, session: Session, services: Services) -> Self {
        let notifications = NotificationService::new(&window, config.notification_delay());
        let validation = ValidationService::new(window.scheduler(), config.validation_error_duration());
        Self {
            window,
            config: Rc::new(config),
            session: Rc::new(session),
            bus: SignalBus::new(),
            notifications: Rc::new(notifications),
            validation: Rc::new(validation),
            services,
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.window.document()
    }

    #[must_use]
    pub fn scheduler(&self) -> Rc<Scheduler> {
        self.window.scheduler()
    }

    /// Sets the document title to `"<page> | <app title>"`.
    pub fn set_title(&self, page: &str) {
        self.document()
            .set_title(&format!("{page} | {}", self.config.app_title));
    }

    /// Shows a success banner, logging if the banner is not mounted.
    pub fn notify_success(&self, message: &str) {
        if let Err(err) = self.notifications.notify(NotificationKind::Success, message) {
            tracing::warn!(error = %err, message, "Could not show notification");
        }
    }

    /// Surfaces a collaborator failure in the error banner.
    pub fn notify_error(&self, error: &AppError) {
        tracing::debug!(error = %error, "Surfacing error to user");
        if let Err(err) = self
            .notifications
            .notify(NotificationKind::Error, &error.to_string())
        {
            tracing::warn!(error = %err, "Could not show notification");
        }
    }
}
