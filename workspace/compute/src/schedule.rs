//! Maintenance due-date projection.

use chrono::{Months, NaiveDate};

/// Projects the next maintenance date: the last one plus a whole number of
/// months, with the day clamped to the end of the target month when the
/// original day does not exist there (Jan 31 + 1 month is Feb 28, or Feb 29
/// in a leap year). No date to project from means no projection.
pub fn project_next(last: Option<NaiveDate>, interval_months: u32) -> Option<NaiveDate> {
    last.and_then(|date| date.checked_add_months(Months::new(interval_months)))
}

/// Signed days until the next maintenance, negative once it is overdue.
pub fn days_until(next: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    next.map(|date| (date - today).num_days())
}
