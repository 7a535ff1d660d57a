//! One row of the transaction history.

use crate::app::View;
use crate::dom::Element;
use crate::domain::error::Result;
use crate::domain::models::Transaction;
use crate::utils::{format_date, format_to_currency};

pub struct TransactionItem {
    transaction: Transaction,
}

impl TransactionItem {
    #[must_use]
    pub const fn new(transaction: Transaction) -> Self {
        Self { transaction }
    }
}

impl View for TransactionItem {
    fn render(&mut self) -> Result<Element> {
        let tx = &self.transaction;
        let root = Element::new("div");
        root.add_class("transaction-item");
        root.add_class(if tx.amount >= 0.0 { "income" } else { "expense" });

        for (class, text) in [
            ("type", tx.kind.label().to_string()),
            ("date", format_date(&tx.created_at)),
            ("amount", format_to_currency(tx.amount)),
        ] {
            let cell = Element::new("div");
            cell.add_class(class);
            cell.set_text_content(&text);
            root.append_child(&cell)?;
        }
        Ok(root)
    }

    fn teardown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransactionKind;

    #[test]
    fn renders_signed_amount_and_date() {
        let mut item = TransactionItem::new(Transaction {
            id: 1,
            user_id: 1,
            amount: -350.0,
            kind: TransactionKind::Withdrawal,
            created_at: "2024-01-12T16:30:00Z".to_string(),
        });
        let row = item.render().unwrap();
        assert!(row.has_class("expense"));
        assert_eq!(row.text_content(), "WithdrawalJan 12, 2024-$350.00");
    }
}
