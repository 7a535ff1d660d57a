//! Error types for the Red Bank client core.
//!
//! This module defines the centralized error type [`AppError`] and a type alias
//! [`Result`] used throughout the crate. All variants are implemented with the
//! `thiserror` crate.
//!
//! # Taxonomy
//!
//! - [`AppError::NotFound`]: a query for a missing element, parent, template
//!   slot or mount point. Unmatched routes are *not* errors; the router falls
//!   back to the not-found view instead.
//! - [`AppError::TypeMismatch`]: a form operation invoked on an element whose
//!   tag or `type` attribute does not support it.
//! - [`AppError::InvalidArgument`]: a disallowed value for a constrained
//!   parameter, such as an unsupported notification kind.
//!
//! Element query errors are programmer errors. They propagate synchronously
//! to the caller through `?` and are never swallowed inside the query layer.

use thiserror::Error;

/// The main error type for Red Bank operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// A queried element, parent, template slot or mount point does not exist.
    ///
    /// The string describes what was looked up (usually the selector).
    #[error("Element {0} not found")]
    NotFound(String),

    /// An operation was invoked on an incompatible element kind.
    ///
    /// `expected` names the element the operation requires (for example
    /// `input[type=number]`), `found` describes the element it was called on.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Element kind the operation requires.
        expected: String,
        /// Element kind the operation was invoked on.
        found: String,
    },

    /// A constrained parameter received a disallowed value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A collaborator service rejected or failed a request.
    ///
    /// These are surfaced to the user through the notification banner by the
    /// component that made the call.
    #[error("{0}")]
    Api(String),

    /// Configuration or route table is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Shorthand for a [`AppError::TypeMismatch`] with owned strings.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns `true` for [`AppError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A specialized `Result` type for Red Bank operations.
pub type Result<T> = std::result::Result<T, AppError>;
