//! Simulated browser environment.
//!
//! The [`Window`] owns the page [`Document`](crate::dom::Document), the
//! session [`History`] with its `popstate` notifications and the virtual
//! timer [`Scheduler`].

pub mod history;
pub mod location;
pub mod scheduler;
pub mod window;

pub use history::History;
pub use location::resolve_href;
pub use scheduler::{Scheduler, Task, TimerId};
pub use window::{Window, WindowListener};
