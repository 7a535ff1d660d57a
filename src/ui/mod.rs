//! Presentation layer: the layout shell and reusable components.
//!
//! # Architecture
//!
//! ```text
//! Router ──▶ Layout (built once) ──▶ Header ──▶ Search
//!               │
//!               └── .content ◀── routed screen ◀── components
//! ```
//!
//! # Modules
//!
//! - [`layout`]: Notification banner, header and content region
//! - [`components`]: Header, search and the building blocks screens compose

pub mod components;
pub mod layout;

pub use layout::Layout;
