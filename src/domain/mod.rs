//! Domain layer for the Red Bank client.
//!
//! This module contains the error taxonomy and the banking records exchanged
//! with collaborator services. Nothing here depends on the DOM, the router or
//! the timer queue.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`models`]: Cards, users, transactions, statistics

pub mod error;
pub mod models;

pub use error::{AppError, Result};
pub use models::{
    BalanceAction, Card, Statistic, Transaction, TransactionKind, TransactionPage,
    TransferRequest, UserProfile,
};
