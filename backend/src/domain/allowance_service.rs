//! Daily allowance allocation for the budget tracker.
//!
//! Every allowance is "money divided by chargeable days left", but each
//! operation picks its own numerator and day count:
//!
//! | operation             | numerator          | day count              |
//! |-----------------------|--------------------|------------------------|
//! | `setup_budget`        | starting balances  | no breaks (fresh)      |
//! | `set_budget_end_date` | starting balances  | break-adjusted         |
//! | `respread`            | current balances   | break-adjusted, floor  |
//!
//! A non-positive day count yields a zero allowance rather than an error.

use chrono::NaiveDate;
use log::{debug, info};

use crate::domain::break_calendar::BreakCalendar;
use crate::domain::ledger_service::LedgerService;
use crate::domain::models::budget::sum_balances;
use crate::domain::models::{Balances, BudgetError, UserBudgetRecord};

/// Spread `total` across `days`, never producing a negative allowance
pub fn spread_over(total: f64, days: i64) -> f64 {
    if days > 0 {
        (total / days as f64).max(0.0)
    } else {
        0.0
    }
}

#[derive(Clone, Default)]
pub struct AllowanceService {
    break_calendar: BreakCalendar,
    ledger_service: LedgerService,
}

impl AllowanceService {
    pub fn new(break_calendar: BreakCalendar, ledger_service: LedgerService) -> Self {
        Self {
            break_calendar,
            ledger_service,
        }
    }

    /// Whether a completed budget exists
    pub fn is_budget_setup(&self, record: Option<&UserBudgetRecord>) -> bool {
        record.map_or(false, |r| r.is_configured())
    }

    /// Create a configured record.
    ///
    /// Fails with `AlreadyConfigured` if `existing` already has an end date.
    pub fn setup_budget(
        &self,
        existing: Option<&UserBudgetRecord>,
        starting_balances: &Balances,
        end_date: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<UserBudgetRecord, BudgetError> {
        if self.is_budget_setup(existing) {
            return Err(BudgetError::AlreadyConfigured);
        }

        let mut record = UserBudgetRecord::new(starting_balances, end_date);
        let days = BreakCalendar::chargeable_days_between(as_of, end_date, &[]);
        record.daily_budget = spread_over(sum_balances(&record.starting_balances), days);

        info!(
            "Set up budget ending {} with {:.2} over {} days: {:.2}/day",
            end_date,
            sum_balances(&record.starting_balances),
            days,
            record.daily_budget
        );
        Ok(record)
    }

    /// Move the end date and restate the allowance from the starting balances
    pub fn set_budget_end_date(
        &self,
        record: &mut UserBudgetRecord,
        new_end_date: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<f64, BudgetError> {
        let previous_end = record.end_date()?;

        let days = BreakCalendar::chargeable_days_between(as_of, new_end_date, &record.breaks);
        let daily_budget = spread_over(sum_balances(&record.starting_balances), days);

        record.budget_end_date = Some(new_end_date);
        record.daily_budget = daily_budget;

        info!(
            "Moved budget end date from {} to {} ({} chargeable days): {:.2}/day",
            previous_end, new_end_date, days, daily_budget
        );
        Ok(daily_budget)
    }

    /// Recompute the allowance from current balances.
    ///
    /// The new value is applied only when it is at least the budget floor;
    /// otherwise the record is left as it was. Returns whether it applied.
    pub fn respread(
        &self,
        record: &mut UserBudgetRecord,
        as_of: NaiveDate,
    ) -> Result<bool, BudgetError> {
        let days = self.break_calendar.remaining_chargeable_days(record, as_of)?;
        let spread = spread_over(self.total_balance(record), days);

        if spread >= record.budget_floor {
            info!(
                "Respread {:.2} over {} days: {:.2}/day",
                self.total_balance(record),
                days,
                spread
            );
            record.daily_budget = spread;
            Ok(true)
        } else {
            debug!(
                "Respread of {:.2}/day is below floor {:.2}, keeping {:.2}/day",
                spread, record.budget_floor, record.daily_budget
            );
            Ok(false)
        }
    }

    /// Set the minimum allowance respread may apply; negative floors are rejected
    pub fn set_budget_floor(
        &self,
        record: &mut UserBudgetRecord,
        floor: f64,
    ) -> Result<(), BudgetError> {
        if !floor.is_finite() || floor < 0.0 {
            return Err(BudgetError::InvalidFloorValue(floor));
        }
        record.budget_floor = floor;
        info!("Set budget floor to {:.2}/day", floor);
        Ok(())
    }

    pub fn daily_allowance(&self, record: &UserBudgetRecord) -> f64 {
        record.daily_budget
    }

    pub fn total_balance(&self, record: &UserBudgetRecord) -> f64 {
        sum_balances(&record.balances)
    }

    /// Allowance left for `as_of` after that day's spending; may be negative
    pub fn remaining_today(&self, record: &UserBudgetRecord, as_of: NaiveDate) -> f64 {
        record.daily_budget - self.ledger_service.spent_on(record, as_of)
    }
}
