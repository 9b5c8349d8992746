//! Period keys used to bucket transactions for summaries.

use chrono::{Datelike, Duration, NaiveDate};

/// `YYYY-MM` month key for a date
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Monday on or before `date`. Sundays map back six days.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_back = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(days_back))
}

/// `YYYY-MM-DD` of the Monday starting the week containing `date`
pub fn week_key(date: NaiveDate) -> String {
    week_start(date).format("%Y-%m-%d").to_string()
}
