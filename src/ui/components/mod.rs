//! Reusable UI components.
//!
//! Every component implements [`View`](crate::app::View) and renders one
//! detached subtree. Stateless components have a no-op teardown; stateful ones
//! (the header and search) embed a [`ComponentBase`](crate::app::ComponentBase).
//!
//! # Components
//!
//! - [`header`]: Logo, search, navigation and user badge
//! - [`search`]: Debounced contact search
//! - [`heading`]: Section heading
//! - [`field`]: Labelled text, number and card-number inputs
//! - [`button`]: Colored button with a click handler
//! - [`loader`]: Placeholder shown while data loads
//! - [`user_item`]: Contact row
//! - [`transaction_item`]: Transaction history row
//! - [`statistic_item`]: Labelled statistic value
//! - [`circle_chart`]: Income/expense split chart

pub mod button;
pub mod circle_chart;
pub mod field;
pub mod header;
pub mod heading;
pub mod loader;
pub mod search;
pub mod statistic_item;
pub mod transaction_item;
pub mod user_item;

pub use button::{Button, ButtonVariant};
pub use circle_chart::{chart_split, CircleChart};
pub use field::{Field, FieldKind};
pub use header::Header;
pub use heading::Heading;
pub use loader::{remove_loader, Loader, LOADER_SELECTOR};
pub use search::Search;
pub use statistic_item::StatisticItem;
pub use transaction_item::TransactionItem;
pub use user_item::{UserAction, UserItem};
