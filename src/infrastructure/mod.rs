//! Filesystem path helpers.

pub mod paths;

pub use paths::{expand_home, expand_tilde};
