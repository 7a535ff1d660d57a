//! Banking domain models exchanged with the collaborator services.
//!
//! These are plain serde records. The core never interprets them; screens
//! and child components render them and the in-memory backend stores them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::AppError;

/// A payment card owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// 16-digit card number without separators.
    pub number: String,
    /// Current balance in dollars.
    pub balance: f64,
    /// Expiry date as `MM/YY`.
    #[serde(default)]
    pub expire_date: String,
    /// Card verification code.
    #[serde(default)]
    pub cvc: String,
}

/// A registered bank user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_path: Option<String>,
    pub card: Card,
}

/// Kind of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    TopUp,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    /// Human-readable label used by transaction rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopUp => "Top-up",
            Self::Withdrawal => "Withdrawal",
            Self::Transfer => "Transfer",
        }
    }
}

/// A single ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub user_id: u64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

/// Page of transactions returned by the transaction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub length: usize,
}

/// Labelled aggregate (income or expense) returned by the statistic service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub label: String,
    pub value: f64,
}

/// Direction of a balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceAction {
    TopUp,
    Withdrawal,
}

impl BalanceAction {
    /// Path segment and wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopUp => "top-up",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for BalanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-up" => Ok(Self::TopUp),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(AppError::InvalidArgument(format!(
                "balance action must be \"top-up\" or \"withdrawal\", got {other:?}"
            ))),
        }
    }
}

/// Money transfer between two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub amount: f64,
    pub from_card_number: String,
    pub to_card_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_action_parses_wire_names() {
        assert_eq!("top-up".parse::<BalanceAction>().unwrap(), BalanceAction::TopUp);
        assert_eq!(
            "withdrawal".parse::<BalanceAction>().unwrap(),
            BalanceAction::Withdrawal
        );
        assert!(matches!(
            "refund".parse::<BalanceAction>(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn transaction_kind_uses_type_field() {
        let json = r#"{"id":1,"user_id":2,"amount":10.0,"type":"top-up","created_at":"2024-01-05T10:00:00Z"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.kind, TransactionKind::TopUp);
        assert_eq!(tx.kind.label(), "Top-up");
    }
}
