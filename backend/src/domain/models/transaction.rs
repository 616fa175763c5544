//! Domain model for a ledger entry.
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::CurrencyKind;

/// Whether a recorded amount adds to or takes from a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDirection {
    Credit,
    Debit,
}

impl TransactionDirection {
    /// Apply the direction's sign to an unsigned amount
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionDirection::Credit => amount,
            TransactionDirection::Debit => -amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Positive for credits, negative for expenditures
    pub amount: f64,
    pub description: String,
    pub currency: CurrencyKind,
    pub timestamp: DateTime<FixedOffset>,
}

impl Transaction {
    /// Calendar date in the offset the entry was recorded in
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}
