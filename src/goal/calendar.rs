//! Day arithmetic within a calendar year.

use chrono::{Datelike, NaiveDate};

/// 365 or 366.
pub fn days_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|last| last.ordinal())
        .unwrap_or(365)
}

/// Whole days elapsed since January 1st (0 on January 1st).
pub fn days_since_start_of_year(date: NaiveDate) -> u32 {
    date.ordinal0()
}

/// Whole days until December 31st (0 on December 31st).
pub fn days_left_in_year(date: NaiveDate) -> u32 {
    days_in_year(date.year()).saturating_sub(date.ordinal())
}
