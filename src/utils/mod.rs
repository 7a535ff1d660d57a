//! Formatting helpers and the search debouncer.

pub mod debounce;
pub mod format;

pub use debounce::Debouncer;
pub use format::{format_card_number, format_card_number_with_dashes, format_date, format_to_currency};
