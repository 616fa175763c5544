//! Report formatting for the budget tracker.
//!
//! Pure functions that turn a `UserBudgetRecord` into the text a front end
//! shows: the daily budget report and the transaction history. Nothing here
//! mutates a record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::CurrencyKind;

use crate::domain::allowance_service::AllowanceService;
use crate::domain::break_calendar::BreakCalendar;
use crate::domain::ledger_service::LedgerService;
use crate::domain::models::{Transaction, UserBudgetRecord};

/// Date formatting options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DateFormat {
    LongDate,  // "Monday, October 19, 2026"
    ShortDate, // "10/19/2026"
    Iso,       // "2026-10-19"
}

/// Configuration for report text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    pub currency_symbol: String,
    pub date_format: DateFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: DateFormat::LongDate,
        }
    }
}

#[derive(Clone)]
pub struct ReportService {
    config: ReportConfig,
    allowance_service: AllowanceService,
    break_calendar: BreakCalendar,
    ledger_service: LedgerService,
}

impl ReportService {
    pub fn new(
        allowance_service: AllowanceService,
        break_calendar: BreakCalendar,
        ledger_service: LedgerService,
    ) -> Self {
        Self::with_config(
            ReportConfig::default(),
            allowance_service,
            break_calendar,
            ledger_service,
        )
    }

    pub fn with_config(
        config: ReportConfig,
        allowance_service: AllowanceService,
        break_calendar: BreakCalendar,
        ledger_service: LedgerService,
    ) -> Self {
        Self {
            config,
            allowance_service,
            break_calendar,
            ledger_service,
        }
    }

    /// Balances, allowance, today's spending and upcoming breaks
    pub fn build_daily_report(&self, record: &UserBudgetRecord, as_of: NaiveDate) -> String {
        let mut report = String::new();

        report.push_str(&format!("Budget report for {}\n", self.format_date(as_of)));
        match record.budget_end_date {
            Some(end_date) => {
                let days = self
                    .break_calendar
                    .remaining_chargeable_days(record, as_of)
                    .unwrap_or(0);
                report.push_str(&format!(
                    "Budget ends {} ({} chargeable days left)\n",
                    self.format_date(end_date),
                    days.max(0),
                ));
            }
            None => {
                report.push_str("Budget end date: not set\n");
            }
        }

        report.push('\n');
        report.push_str("Balances\n");
        for currency in CurrencyKind::ALL {
            report.push_str(&format!(
                "  {:<16}{:>12}\n",
                currency.display_name(),
                self.format_balance(record.balance(currency)),
            ));
        }
        report.push_str(&format!(
            "  {:<16}{:>12}\n",
            "Total",
            self.format_balance(self.allowance_service.total_balance(record)),
        ));

        report.push('\n');
        report.push_str(&format!(
            "{:<18}{:>12}\n",
            "Daily budget:",
            self.format_balance(self.allowance_service.daily_allowance(record)),
        ));
        report.push_str(&format!(
            "{:<18}{:>12}\n",
            "Spent today:",
            self.format_balance(self.ledger_service.spent_on(record, as_of)),
        ));
        report.push_str(&format!(
            "{:<18}{:>12}\n",
            "Remaining today:",
            self.format_balance(self.allowance_service.remaining_today(record, as_of)),
        ));
        if record.budget_floor > 0.0 {
            report.push_str(&format!(
                "{:<18}{:>12}\n",
                "Budget floor:",
                self.format_balance(record.budget_floor),
            ));
        }

        let upcoming: Vec<_> = self
            .break_calendar
            .list_breaks(record)
            .into_iter()
            .filter(|(_, interval)| interval.end >= as_of)
            .collect();
        if !upcoming.is_empty() {
            report.push('\n');
            report.push_str("Breaks\n");
            for (index, interval) in upcoming {
                report.push_str(&format!(
                    "  [{}] {} ({} days)\n",
                    index,
                    interval,
                    interval.length_days(),
                ));
            }
            let overlaps = self.break_calendar.overlapping_pairs(record);
            for (a, b) in overlaps {
                report.push_str(&format!("  Note: breaks [{}] and [{}] overlap\n", a, b));
            }
        }

        report.trim_end().to_string()
    }

    /// Transaction history, optionally limited to an inclusive date range
    pub fn build_ledger_report(
        &self,
        record: &UserBudgetRecord,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> String {
        let transactions = self
            .ledger_service
            .transactions_in_range(record, start_date, end_date);
        let mut report = String::new();

        match (start_date, end_date) {
            (Some(start), Some(end)) => {
                report.push_str(&format!(
                    "Transactions from {} to {}\n",
                    self.format_date(start),
                    self.format_date(end),
                ));
            }
            _ => {
                report.push_str("All transactions\n");
            }
        }

        if transactions.is_empty() {
            report.push_str("No transactions\n");
            return report.trim_end().to_string();
        }

        for transaction in &transactions {
            report.push_str(&format!("{}\n", self.format_transaction(transaction)));
        }

        let credits: f64 = transactions
            .iter()
            .filter(|tx| !tx.is_expense())
            .map(|tx| tx.amount)
            .sum();
        let debits: f64 = transactions
            .iter()
            .filter(|tx| tx.is_expense())
            .map(|tx| -tx.amount)
            .sum();
        report.push('\n');
        report.push_str(&format!(
            "Credits: {}  Debits: {}  Net: {}\n",
            self.format_balance(credits),
            self.format_balance(debits),
            self.format_signed_amount(credits - debits),
        ));

        report.trim_end().to_string()
    }

    /// One ledger line: time, signed amount, currency and description
    pub fn format_transaction(&self, transaction: &Transaction) -> String {
        format!(
            "{} {}  {:>10}  {:<14}  {}",
            self.format_date(transaction.date()),
            transaction.timestamp.format("%H:%M"),
            self.format_signed_amount(transaction.amount),
            transaction.currency.display_name(),
            transaction.description
        )
    }

    /// Format a date for display based on configuration
    pub fn format_date(&self, date: NaiveDate) -> String {
        match self.config.date_format {
            DateFormat::LongDate => date.format("%A, %B %d, %Y").to_string(),
            DateFormat::ShortDate => date.format("%m/%d/%Y").to_string(),
            DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// "$12.50" or "-$3.00"
    pub fn format_balance(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.config.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.config.currency_symbol, amount)
        }
    }

    /// "+$12.50" or "-$3.00"
    pub fn format_signed_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.config.currency_symbol, amount.abs())
        } else {
            format!("+{}{:.2}", self.config.currency_symbol, amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Balances, TransactionDirection};
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(y, m, d, hour, 30, 0).unwrap()
    }

    fn create_test_service(date_format: DateFormat) -> ReportService {
        let break_calendar = BreakCalendar::new();
        let ledger_service = LedgerService::new();
        let allowance_service =
            AllowanceService::new(break_calendar.clone(), ledger_service.clone());
        ReportService::with_config(
            ReportConfig {
                currency_symbol: "$".to_string(),
                date_format,
            },
            allowance_service,
            break_calendar,
            ledger_service,
        )
    }

    fn create_test_record() -> UserBudgetRecord {
        let mut starting = Balances::new();
        starting.insert(CurrencyKind::DiningDollars, 50.0);
        starting.insert(CurrencyKind::TigerBucks, 30.0);
        starting.insert(CurrencyKind::Usd, 20.0);
        let mut record = UserBudgetRecord::new(&starting, date(2026, 10, 29));
        record.daily_budget = 10.0;

        let ledger = LedgerService::new();
        let (debit, credit) = (TransactionDirection::Debit, TransactionDirection::Credit);
        let dining = CurrencyKind::DiningDollars;
        ledger
            .record_transaction_at(&mut record, 15.0, "Dinner", dining, debit, at(2026, 10, 19, 18))
            .unwrap();
        let usd = CurrencyKind::Usd;
        ledger
            .record_transaction_at(&mut record, 5.0, "Refund", usd, credit, at(2026, 10, 17, 9))
            .unwrap();
        record
    }

    #[test]
    fn test_daily_report_contents() {
        let service = create_test_service(DateFormat::Iso);
        let mut record = create_test_record();
        BreakCalendar::new().add_break(&mut record, date(2026, 10, 24), date(2026, 10, 25));

        let report = service.build_daily_report(&record, date(2026, 10, 19));

        assert!(report.starts_with("Budget report for 2026-10-19"));
        assert!(report.contains("Budget ends 2026-10-29 (8 chargeable days left)"));
        assert!(report.contains("Dining Dollars"));
        assert!(report.contains("$35.00"));
        assert!(report.contains("$90.00"));
        assert!(report.contains("Remaining today:"));
        assert!(report.contains("-$5.00"));
        assert!(report.contains("[0] 2026-10-24 to 2026-10-25 (2 days)"));
        assert!(!report.contains("Budget floor"));
    }

    #[test]
    fn test_daily_report_is_deterministic() {
        let service = create_test_service(DateFormat::LongDate);
        let record = create_test_record();

        let first = service.build_daily_report(&record, date(2026, 10, 19));
        let second = service.build_daily_report(&record, date(2026, 10, 19));

        assert_eq!(first, second);
        assert!(first.contains("Monday, October 19, 2026"));
    }

    #[test]
    fn test_daily_report_without_setup() {
        let service = create_test_service(DateFormat::Iso);
        let report = service.build_daily_report(&UserBudgetRecord::default(), date(2026, 10, 19));
        assert!(report.contains("Budget end date: not set"));
    }

    #[test]
    fn test_ledger_report_full_and_ranged() {
        let service = create_test_service(DateFormat::Iso);
        let record = create_test_record();

        let full = service.build_ledger_report(&record, None, None);
        assert!(full.starts_with("All transactions"));
        assert!(full.contains("2026-10-19 18:30"));
        assert!(full.contains("-$15.00"));
        assert!(full.contains("+$5.00"));
        assert!(full.contains("Credits: $5.00  Debits: $15.00  Net: -$10.00"));

        let (start, end) = (date(2026, 10, 18), date(2026, 10, 19));
        let ranged = service.build_ledger_report(&record, Some(start), Some(end));
        assert!(ranged.starts_with("Transactions from 2026-10-18 to 2026-10-19"));
        assert!(ranged.contains("Dinner"));
        assert!(!ranged.contains("Refund"));
    }

    #[test]
    fn test_ledger_report_empty_range() {
        let service = create_test_service(DateFormat::ShortDate);
        let record = create_test_record();

        let (start, end) = (date(2026, 9, 1), date(2026, 9, 30));
        let report = service.build_ledger_report(&record, Some(start), Some(end));
        assert_eq!(report, "Transactions from 09/01/2026 to 09/30/2026\nNo transactions");
    }

    #[test]
    fn test_format_amounts() {
        let service = create_test_service(DateFormat::Iso);
        assert_eq!(service.format_balance(10.5), "$10.50");
        assert_eq!(service.format_balance(-3.0), "-$3.00");
        assert_eq!(service.format_signed_amount(10.5), "+$10.50");
        assert_eq!(service.format_signed_amount(-3.0), "-$3.00");
    }
}
