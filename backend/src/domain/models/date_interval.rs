//! Inclusive date intervals used for budget breaks.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date range, inclusive on both ends.
///
/// `start <= end` is expected; it is checked by the command layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of calendar days covered
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Days of this interval still to come, counting `as_of` itself.
    ///
    /// Fully elapsed intervals count zero; an interval that has started only
    /// counts from `as_of` onwards.
    pub fn chargeable_days_from(&self, as_of: NaiveDate) -> i64 {
        if self.end < as_of {
            0
        } else if self.start < as_of {
            (self.end - as_of).num_days() + 1
        } else {
            self.length_days()
        }
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
