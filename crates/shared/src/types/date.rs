//! Calendar helpers for due dates and overdue checks.

use chrono::{Days, NaiveDate, Utc};

/// Returns the current UTC calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Adds `days` calendar days to `date`, or `None` on calendar overflow.
#[must_use]
pub fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

/// Returns true if `date` lies strictly before `today`.
///
/// A due date equal to today is not yet in the past.
#[must_use]
pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}
