//! Headless document model.
//!
//! A small in-process stand-in for the browser DOM: an element tree with
//! attributes, form values and bubbling events, a selector engine and an HTML
//! fragment parser. Everything above this layer (query handles, components,
//! the router) manipulates the page exclusively through these types.
//!
//! # Organization
//!
//! - [`node`]: [`Element`] handles and tree mutation
//! - [`event`]: [`Event`] dispatch and listener registrations
//! - [`selector`]: CSS selector parsing and matching
//! - [`html`]: Fragment parsing and serialization
//! - [`document`]: The page [`Document`]

pub mod document;
pub mod event;
pub mod html;
pub mod node;
pub mod selector;

pub use document::Document;
pub use event::{Event, Listener, ListenerId};
pub use node::Element;
pub use selector::Selector;
