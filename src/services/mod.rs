//! Cross-cutting services shared by every view.
//!
//! # Modules
//!
//! - [`bus`]: Typed signal bus with subscription guards
//! - [`notification`]: Success/error banner with a single auto-hide timer
//! - [`render`]: HTML templates with `<component-NAME>` slots
//! - [`validation`]: Temporary invalid-field highlighting

pub mod bus;
pub mod notification;
pub mod render;
pub mod validation;

pub use bus::{Signal, SignalBus, Subscription};
pub use notification::{NotificationKind, NotificationService};
pub use render::{html_to_element, render_template};
pub use validation::ValidationService;
