//! Local wall-clock helpers.
use chrono::{DateTime, FixedOffset, Local, NaiveDate};

/// Current instant in the machine's local offset
pub fn now() -> DateTime<FixedOffset> {
    let local = Local::now();
    local.with_timezone(local.offset())
}

/// Today's calendar date in the local offset
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
