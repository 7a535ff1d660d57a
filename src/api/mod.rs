//! Collaborator service interfaces and the in-memory bank backend.
//!
//! Views never talk to a backend directly: they call these object-safe traits
//! through the [`AppContext`](crate::app::AppContext). Every call takes the
//! caller's [`CancellationToken`] and a one-shot [`Completion`] that receives
//! the result once the (simulated) network round trip finishes. A completion
//! whose token was cancelled in the meantime is dropped without being called.
//!
//! # Implementations
//!
//! - [`MemoryBank`]: seeded users, cards and transactions held in memory,
//!   optionally persisted to a JSON file, answering after a configurable
//!   latency on the virtual timer queue.

pub mod cancellation;
pub mod memory;

pub use cancellation::CancellationToken;
pub use memory::MemoryBank;

use crate::domain::error::Result;
use crate::domain::models::{
    BalanceAction, Card, Statistic, TransactionPage, TransferRequest, UserProfile,
};

/// One-shot continuation for an asynchronous collaborator call.
pub type Completion<T> = Box<dyn FnOnce(Result<T>)>;

/// Card balance and transfer endpoints (`/cards`).
pub trait CardService {
    /// Card of the signed-in user.
    fn by_user(&self, token: &CancellationToken, done: Completion<Card>);

    /// Tops up or withdraws `amount` from the signed-in user's card.
    fn update_balance(
        &self,
        amount: f64,
        action: BalanceAction,
        token: &CancellationToken,
        done: Completion<()>,
    );

    /// Moves money between two cards.
    fn transfer(&self, request: TransferRequest, token: &CancellationToken, done: Completion<()>);
}

/// User directory (`/users`).
pub trait UserService {
    /// Contacts of the signed-in user, ranked against `search` when given.
    fn get_all(
        &self,
        search: Option<String>,
        token: &CancellationToken,
        done: Completion<Vec<UserProfile>>,
    );
}

/// Transaction history (`/transactions`), newest first.
pub trait TransactionService {
    fn get_all(&self, token: &CancellationToken, done: Completion<TransactionPage>);

    fn get_by_id(&self, user_id: u64, token: &CancellationToken, done: Completion<TransactionPage>);
}

/// Income/expense aggregates (`/statistics`).
pub trait StatisticService {
    fn main(&self, token: &CancellationToken, done: Completion<Vec<Statistic>>);
}
