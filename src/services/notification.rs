//! Transient success/error banner.
//!
//! The banner is the `#notification` element of the layout shell. Each call
//! replaces the message and the visual class, and restarts the single
//! auto-hide timer. There is no queue: a newer message simply wins.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use crate::browser::{Scheduler, TimerId, Window};
use crate::dom::Document;
use crate::domain::error::{AppError, Result};
use crate::query::Query;

/// Banner flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Class applied to the banner while the message is visible.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Success => "notification--success",
            Self::Error => "notification--error",
        }
    }

    const fn other(self) -> Self {
        match self {
            Self::Success => Self::Error,
            Self::Error => Self::Success,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(AppError::InvalidArgument(format!(
                "notification type can only be \"success\" or \"error\", got {other:?}"
            ))),
        }
    }
}

/// Shows messages in the `#notification` banner.
pub struct NotificationService {
    document: Document,
    scheduler: Rc<Scheduler>,
    delay: Duration,
    timer: Rc<Cell<Option<TimerId>>>,
}

impl fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationService")
            .field("delay", &self.delay)
            .field("timer", &self.timer.get())
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    #[must_use]
    pub fn new(window: &Window, delay: Duration) -> Self {
        Self {
            document: window.document().clone(),
            scheduler: window.scheduler(),
            delay,
            timer: Rc::new(Cell::new(None)),
        }
    }

    /// Untyped entry point.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidArgument`] for a kind other than `success` or
    /// `error` (nothing is mutated), or [`AppError::NotFound`] when the
    /// banner is not mounted.
    pub fn show(&self, kind: &str, message: &str) -> Result<()> {
        let kind = kind.parse::<NotificationKind>()?;
        self.notify(kind, message)
    }

    /// Displays `message` and (re)starts the hide timer.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when the `#notification` banner is not mounted.
    pub fn notify(&self, kind: NotificationKind, message: &str) -> Result<()> {
        let banner = Query::select(&self.document, "#notification")?;
        banner
            .set_text(message)
            .remove_class(kind.other().class_name())
            .add_class(kind.class_name());

        if let Some(previous) = self.timer.take() {
            self.scheduler.clear_timeout(previous);
        }

        let timer = Rc::clone(&self.timer);
        let banner = banner.into_element();
        let id = self.scheduler.set_timeout(self.delay, move || {
            banner.remove_class(kind.class_name());
            timer.set(None);
        });
        self.timer.set(Some(id));

        tracing::debug!(%kind, message, "Notification shown");
        Ok(())
    }

    /// Whether a hide timer is pending.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.timer.get().is_some()
    }
}
