//! Application core: view lifecycle, context and routing.
//!
//! This layer sits between the headless browser substrate ([`crate::browser`],
//! [`crate::dom`]) and the concrete screens. It decides which view is on
//! screen, owns its lifetime and hands every view the same explicit context.
//!
//! # Architecture
//!
//! ```text
//! click / popstate ──▶ Router ──▶ RouteTable ──▶ ViewFactory ──▶ View
//!                        │                                        │
//!                        └──── Layout shell (#app) ◀── subtree ───┘
//!
//! View ──▶ collaborator call ──▶ SignalBus::publish ──▶ subscribed views
//! ```
//!
//! # Modules
//!
//! - [`component`]: `View`/`Screen` traits and the per-instance lifecycle base
//! - [`context`]: Session, collaborator services and shared handles
//! - [`routes`]: Route table formats and the view factory contract
//! - [`router`]: Listeners, resolution and content swapping
//!
//! # Example
//!
//! ```rust
//! use redbank::app::{RouteTable, ViewId};
//!
//! let routes = RouteTable::default();
//! assert_eq!(routes.resolve("/about"), ViewId::About);
//! assert_eq!(routes.resolve("/nope"), ViewId::NotFound);
//! ```

pub mod component;
pub mod context;
pub mod router;
pub mod routes;

pub use component::{ComponentBase, Lifecycle, Screen, View};
pub use context::{AppContext, Services, Session};
pub use router::Router;
pub use routes::{RouteEntry, RouteTable, ViewFactory, ViewId};
