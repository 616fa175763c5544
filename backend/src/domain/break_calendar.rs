//! Break calendar for the budget tracker.
//!
//! Breaks are date ranges (holidays, trips home) during which no allowance
//! accrues or is consumed. They are kept in insertion order and are never
//! merged, so overlapping breaks each subtract their own days.

use chrono::NaiveDate;
use log::{info, warn};

use crate::domain::models::{BudgetError, DateInterval, UserBudgetRecord};

#[derive(Clone, Default)]
pub struct BreakCalendar {}

impl BreakCalendar {
    pub fn new() -> Self {
        Self {}
    }

    /// Append a break without merging it into existing ones
    pub fn add_break(
        &self,
        record: &mut UserBudgetRecord,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DateInterval {
        let interval = DateInterval::new(start, end);

        for (index, existing) in record.breaks.iter().enumerate() {
            if existing.overlaps(&interval) {
                warn!("Break {} overlaps existing break [{}] {}", interval, index, existing);
            }
        }

        record.breaks.push(interval);
        info!("Added break {} ({} breaks total)", interval, record.breaks.len());
        interval
    }

    /// Remove a break by position; later breaks shift down by one
    pub fn remove_break(
        &self,
        record: &mut UserBudgetRecord,
        index: usize,
    ) -> Result<DateInterval, BudgetError> {
        if index >= record.breaks.len() {
            return Err(BudgetError::IndexOutOfRange {
                index,
                len: record.breaks.len(),
            });
        }

        let removed = record.breaks.remove(index);
        info!("Removed break [{}] {}", index, removed);
        Ok(removed)
    }

    /// Breaks paired with the index `remove_break` expects
    pub fn list_breaks<'a>(&self, record: &'a UserBudgetRecord) -> Vec<(usize, &'a DateInterval)> {
        record.breaks.iter().enumerate().collect()
    }

    /// Index pairs `(i, j)` with `i < j` whose intervals overlap
    pub fn overlapping_pairs(&self, record: &UserBudgetRecord) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in record.breaks.iter().enumerate() {
            for (j, b) in record.breaks.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Days left until the budget end date that are not inside a break.
    ///
    /// The result may be zero or negative; callers treat that as no
    /// chargeable days left.
    pub fn remaining_chargeable_days(
        &self,
        record: &UserBudgetRecord,
        as_of: NaiveDate,
    ) -> Result<i64, BudgetError> {
        let end_date = record.end_date()?;
        Ok(Self::chargeable_days_between(as_of, end_date, &record.breaks))
    }

    /// Chargeable days from `as_of` until `end_date` given a set of breaks
    pub fn chargeable_days_between(
        as_of: NaiveDate,
        end_date: NaiveDate,
        breaks: &[DateInterval],
    ) -> i64 {
        let total_days = (end_date - as_of).num_days();
        let break_days: i64 = breaks
            .iter()
            .map(|interval| interval.chargeable_days_from(as_of))
            .sum();
        total_days - break_days
    }
}
