//! Routed screens.
//!
//! # Modules
//!
//! - [`home`]: Dashboard with card, actions, contacts, statistics and history
//! - [`about`]: Static about page
//! - [`not_found`]: Fallback for unknown paths
//!
//! [`ScreenFactory`] maps each [`ViewId`] to its screen.

pub mod about;
pub mod home;
pub mod not_found;

pub use about::About;
pub use home::Home;
pub use not_found::NotFound;

use crate::app::{AppContext, View, ViewFactory, ViewId};
use crate::domain::error::Result;

/// Builds the bundled screens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenFactory;

impl ViewFactory for ScreenFactory {
    fn create(&self, view: ViewId, ctx: &AppContext) -> Result<Box<dyn View>> {
        tracing::trace!(?view, "Creating screen");
        Ok(match view {
            ViewId::Home => Box::new(Home::new(ctx)),
            ViewId::About => Box::new(About::new(ctx)),
            ViewId::NotFound => Box::new(NotFound::new(ctx)),
        })
    }
}
