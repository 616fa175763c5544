//! Money ledger for the budget tracker.
//!
//! Appends signed transactions to a user's record and keeps the matching
//! balance in step with each entry. Queries work on calendar dates of the
//! recorded timestamps, not rolling 24 hour windows.

use chrono::{DateTime, FixedOffset, NaiveDate};
use log::{info, warn};
use shared::CurrencyKind;

use crate::domain::clock;
use crate::domain::models::{
    BudgetError, Transaction, TransactionDirection, UserBudgetRecord,
};

/// Tolerance used when comparing balances against the ledger
const BALANCE_EPSILON: f64 = 0.001;

#[derive(Clone, Default)]
pub struct LedgerService {}

impl LedgerService {
    pub fn new() -> Self {
        Self {}
    }

    /// Record a credit or debit stamped with the current instant
    pub fn record_transaction(
        &self,
        record: &mut UserBudgetRecord,
        amount: f64,
        description: &str,
        currency: CurrencyKind,
        direction: TransactionDirection,
    ) -> Result<Transaction, BudgetError> {
        self.record_transaction_at(record, amount, description, currency, direction, clock::now())
    }

    /// Record a credit or debit at an explicit instant.
    ///
    /// Debits may take a balance below zero.
    pub fn record_transaction_at(
        &self,
        record: &mut UserBudgetRecord,
        amount: f64,
        description: &str,
        currency: CurrencyKind,
        direction: TransactionDirection,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<Transaction, BudgetError> {
        if !record.is_configured() {
            return Err(BudgetError::NotConfigured);
        }

        let signed_amount = direction.signed(amount);
        let transaction = Transaction {
            amount: signed_amount,
            description: description.to_string(),
            currency,
            timestamp,
        };

        *record.balances.entry(currency).or_insert(0.0) += signed_amount;
        record.ledger.push(transaction.clone());

        info!(
            "Recorded {:?} of {:.2} to {} ({}), balance now {:.2}",
            direction,
            amount,
            currency.display_name(),
            description,
            record.balance(currency)
        );

        if record.balance(currency) < 0.0 {
            warn!(
                "{} balance is overdrawn: {:.2}",
                currency.display_name(),
                record.balance(currency)
            );
        }

        Ok(transaction)
    }

    /// Transactions whose timestamp falls on `date`
    pub fn transactions_on(&self, record: &UserBudgetRecord, date: NaiveDate) -> Vec<Transaction> {
        record
            .ledger
            .iter()
            .filter(|tx| tx.date() == date)
            .cloned()
            .collect()
    }

    /// Transactions within an inclusive date range.
    ///
    /// When either bound is missing the whole ledger is returned.
    pub fn transactions_in_range(
        &self,
        record: &UserBudgetRecord,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<Transaction> {
        match (start_date, end_date) {
            (Some(start), Some(end)) => record
                .ledger
                .iter()
                .filter(|tx| start <= tx.date() && tx.date() <= end)
                .cloned()
                .collect(),
            _ => record.ledger.clone(),
        }
    }

    /// Money spent on `date`, as a positive number
    pub fn spent_on(&self, record: &UserBudgetRecord, date: NaiveDate) -> f64 {
        record
            .ledger
            .iter()
            .filter(|tx| tx.is_expense() && tx.date() == date)
            .map(|tx| -tx.amount)
            .sum()
    }

    pub fn spent_today(&self, record: &UserBudgetRecord) -> f64 {
        self.spent_on(record, clock::today())
    }

    /// Overwrite one balance without adding a ledger entry
    pub fn set_balance(
        &self,
        record: &mut UserBudgetRecord,
        currency: CurrencyKind,
        amount: f64,
    ) -> Result<(), BudgetError> {
        if !record.is_configured() {
            return Err(BudgetError::NotConfigured);
        }
        if !amount.is_finite() {
            return Err(BudgetError::InvalidAmount(amount));
        }

        let previous = record.balance(currency);
        record.balances.insert(currency, amount);
        info!(
            "Set {} balance from {:.2} to {:.2}",
            currency.display_name(),
            previous,
            amount
        );
        Ok(())
    }

    /// Compare each balance with its starting value plus ledger entries.
    ///
    /// Returns one message per mismatching currency; empty when consistent.
    pub fn verify_consistency(&self, record: &UserBudgetRecord) -> Vec<String> {
        let mut errors = Vec::new();

        for currency in CurrencyKind::ALL {
            let ledger_total: f64 = record
                .ledger
                .iter()
                .filter(|tx| tx.currency == currency)
                .map(|tx| tx.amount)
                .sum();
            let expected = record.starting_balance(currency) + ledger_total;
            let actual = record.balance(currency);

            if (expected - actual).abs() > BALANCE_EPSILON {
                let error = format!(
                    "{} balance is {:.2} but the ledger implies {:.2}",
                    currency.display_name(),
                    actual,
                    expected
                );
                warn!("Balance validation error: {}", error);
                errors.push(error);
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Balances;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, hour, 0, 0)
            .unwrap()
    }

    fn create_test_record() -> UserBudgetRecord {
        let mut starting = Balances::new();
        starting.insert(CurrencyKind::DiningDollars, 50.0);
        starting.insert(CurrencyKind::TigerBucks, 30.0);
        starting.insert(CurrencyKind::Usd, 20.0);
        UserBudgetRecord::new(&starting, date(2026, 10, 29))
    }

    fn debit(
        record: &mut UserBudgetRecord,
        amount: f64,
        description: &str,
        currency: CurrencyKind,
        when: DateTime<FixedOffset>,
    ) {
        let direction = TransactionDirection::Debit;
        LedgerService::new()
            .record_transaction_at(record, amount, description, currency, direction, when)
            .unwrap();
    }

    fn credit(
        record: &mut UserBudgetRecord,
        amount: f64,
        description: &str,
        currency: CurrencyKind,
        when: DateTime<FixedOffset>,
    ) {
        let direction = TransactionDirection::Credit;
        LedgerService::new()
            .record_transaction_at(record, amount, description, currency, direction, when)
            .unwrap();
    }

    #[test]
    fn test_debit_adjusts_balance_and_appends_entry() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        let tx = service
            .record_transaction_at(
                &mut record,
                15.0,
                "Lunch",
                CurrencyKind::DiningDollars,
                TransactionDirection::Debit,
                at(2026, 10, 19, 12),
            )
            .unwrap();

        assert_eq!(tx.amount, -15.0);
        assert_eq!(record.balance(CurrencyKind::DiningDollars), 35.0);
        assert_eq!(record.ledger.len(), 1);
        assert_eq!(record.ledger[0].description, "Lunch");
        assert_eq!(record.ledger[0].amount, -15.0);
    }

    #[test]
    fn test_credit_adds_to_balance() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        service
            .record_transaction_at(
                &mut record,
                25.0,
                "Reload",
                CurrencyKind::TigerBucks,
                TransactionDirection::Credit,
                at(2026, 10, 19, 9),
            )
            .unwrap();

        assert_eq!(record.balance(CurrencyKind::TigerBucks), 55.0);
        assert_eq!(record.ledger[0].amount, 25.0);
    }

    #[test]
    fn test_debit_may_overdraw() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        service
            .record_transaction_at(
                &mut record,
                80.0,
                "Textbooks",
                CurrencyKind::Usd,
                TransactionDirection::Debit,
                at(2026, 10, 19, 9),
            )
            .unwrap();

        assert_eq!(record.balance(CurrencyKind::Usd), -60.0);
    }

    #[test]
    fn test_unconfigured_record_is_rejected() {
        let service = LedgerService::new();
        let mut record = UserBudgetRecord::default();

        let result = service.record_transaction_at(
            &mut record,
            5.0,
            "Coffee",
            CurrencyKind::Usd,
            TransactionDirection::Debit,
            at(2026, 10, 19, 9),
        );

        assert_eq!(result, Err(BudgetError::NotConfigured));
        assert!(record.ledger.is_empty());
    }

    #[test]
    fn test_transactions_on_uses_calendar_date() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        // Late evening and early next morning are less than 24h apart
        debit(&mut record, 4.0, "Late snack", CurrencyKind::DiningDollars, at(2026, 10, 18, 23));
        debit(&mut record, 6.0, "Breakfast", CurrencyKind::DiningDollars, at(2026, 10, 19, 7));

        let on_19th = service.transactions_on(&record, date(2026, 10, 19));
        assert_eq!(on_19th.len(), 1);
        assert_eq!(on_19th[0].description, "Breakfast");
    }

    #[test]
    fn test_transactions_in_range_inclusive_bounds() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        for day in 15..=20 {
            let description = format!("Day {}", day);
            debit(&mut record, 1.0, &description, CurrencyKind::Usd, at(2026, 10, day, 12));
        }

        let (start, end) = (date(2026, 10, 16), date(2026, 10, 18));
        let ranged = service.transactions_in_range(&record, Some(start), Some(end));
        let descriptions: Vec<&str> = ranged.iter().map(|tx| tx.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Day 16", "Day 17", "Day 18"]);

        // A missing bound means the whole ledger
        assert_eq!(service.transactions_in_range(&record, Some(start), None).len(), 6);
        assert_eq!(service.transactions_in_range(&record, None, None).len(), 6);
    }

    #[test]
    fn test_spent_on_ignores_credits_and_other_days() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        debit(&mut record, 7.5, "Lunch", CurrencyKind::DiningDollars, at(2026, 10, 19, 12));
        debit(&mut record, 2.5, "Coffee", CurrencyKind::Usd, at(2026, 10, 19, 15));
        credit(&mut record, 40.0, "Paycheck", CurrencyKind::Usd, at(2026, 10, 19, 16));
        debit(&mut record, 9.0, "Dinner", CurrencyKind::DiningDollars, at(2026, 10, 18, 18));

        assert_eq!(service.spent_on(&record, date(2026, 10, 19)), 10.0);
        assert_eq!(service.spent_on(&record, date(2026, 10, 20)), 0.0);
    }

    #[test]
    fn test_balances_stay_consistent_with_ledger() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        debit(&mut record, 12.0, "Groceries", CurrencyKind::TigerBucks, at(2026, 10, 19, 10));
        credit(&mut record, 5.0, "Refund", CurrencyKind::TigerBucks, at(2026, 10, 19, 11));

        assert!(service.verify_consistency(&record).is_empty());
        let total: f64 = record.balances.values().sum();
        assert!((total - 93.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_balance_is_reported_as_inconsistent() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        service.set_balance(&mut record, CurrencyKind::Usd, 42.0).unwrap();

        assert_eq!(record.balance(CurrencyKind::Usd), 42.0);
        assert!(record.ledger.is_empty());
        let errors = service.verify_consistency(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("USD"));
    }

    #[test]
    fn test_set_balance_rejects_non_finite() {
        let service = LedgerService::new();
        let mut record = create_test_record();

        assert_eq!(
            service.set_balance(&mut record, CurrencyKind::Usd, f64::NAN).unwrap_err().to_string(),
            BudgetError::InvalidAmount(f64::NAN).to_string()
        );
        assert_eq!(record.balance(CurrencyKind::Usd), 20.0);
    }
}
