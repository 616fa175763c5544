//! Domain model for a user's budget record.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::CurrencyKind;
use std::collections::BTreeMap;

use super::date_interval::DateInterval;
use super::error::BudgetError;
use super::transaction::Transaction;

pub type Balances = BTreeMap<CurrencyKind, f64>;

/// Everything tracked for one user: balances, allocator state, ledger and breaks.
///
/// A record without a `budget_end_date` has not completed setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBudgetRecord {
    pub balances: Balances,
    /// Snapshot taken at setup, never changed afterwards
    pub starting_balances: Balances,
    pub budget_end_date: Option<NaiveDate>,
    pub daily_budget: f64,
    /// Respread never lowers the allowance below this value; 0.0 means no floor
    pub budget_floor: f64,
    pub ledger: Vec<Transaction>,
    pub breaks: Vec<DateInterval>,
}

impl UserBudgetRecord {
    /// Create a configured record whose balances mirror the starting snapshot
    pub fn new(starting_balances: &Balances, budget_end_date: NaiveDate) -> Self {
        let starting_balances = complete_balances(starting_balances);
        Self {
            balances: starting_balances.clone(),
            starting_balances,
            budget_end_date: Some(budget_end_date),
            daily_budget: 0.0,
            budget_floor: 0.0,
            ledger: Vec::new(),
            breaks: Vec::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.budget_end_date.is_some()
    }

    /// End date, or `NotConfigured` when setup has not happened
    pub fn end_date(&self) -> Result<NaiveDate, BudgetError> {
        self.budget_end_date.ok_or(BudgetError::NotConfigured)
    }

    pub fn balance(&self, currency: CurrencyKind) -> f64 {
        self.balances.get(&currency).copied().unwrap_or(0.0)
    }

    pub fn starting_balance(&self, currency: CurrencyKind) -> f64 {
        self.starting_balances.get(&currency).copied().unwrap_or(0.0)
    }
}

/// Fill in every currency kind, defaulting missing ones to zero
pub fn complete_balances(balances: &Balances) -> Balances {
    CurrencyKind::ALL
        .iter()
        .map(|kind| (*kind, balances.get(kind).copied().unwrap_or(0.0)))
        .collect()
}

/// Sum across all currency kinds
pub fn sum_balances(balances: &Balances) -> f64 {
    balances.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_mirrors_starting_balances() {
        let mut starting = Balances::new();
        starting.insert(CurrencyKind::DiningDollars, 50.0);
        let end = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();

        let record = UserBudgetRecord::new(&starting, end);

        assert!(record.is_configured());
        assert_eq!(record.balances, record.starting_balances);
        assert_eq!(record.balances.len(), CurrencyKind::ALL.len());
        assert_eq!(record.balance(CurrencyKind::DiningDollars), 50.0);
        assert_eq!(record.balance(CurrencyKind::TigerBucks), 0.0);
    }

    #[test]
    fn test_default_record_is_not_configured() {
        let record = UserBudgetRecord::default();
        assert!(!record.is_configured());
        assert_eq!(record.end_date(), Err(BudgetError::NotConfigured));
    }
}
