pub mod chart;
pub mod consumption;
pub mod error;
pub mod period;
pub mod schedule;
pub mod series;
pub mod yoy;

use chrono::{Datelike, NaiveDate, Utc};

/// Returns the default year pair for a comparison view: the current calendar
/// year and the one before it.
///
/// This function uses the provided date as "today" or the current date if
/// none is provided.
pub fn comparison_years(today: Option<NaiveDate>) -> (i32, i32) {
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    (today.year() - 1, today.year())
}
