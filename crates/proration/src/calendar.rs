//! Calendar month arithmetic

use chrono::{Datelike, NaiveDate};

/// First day of the month containing `date`
pub fn first_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// First day of the month following the one containing `date`.
///
/// Advances the month field directly, so Jan 31 leads to Feb 1, never to
/// March.
pub fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the month containing `date` ("day 0" of the next month)
pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    next_month_start(date)?.pred_opt()
}

/// Number of days in a calendar month (28 to 31)
///
/// # Examples
/// ```
/// use proration::days_in_month;
/// assert_eq!(days_in_month(2024, 2), Some(29));
/// assert_eq!(days_in_month(2023, 2), Some(28));
/// assert_eq!(days_in_month(2024, 13), None);
/// ```
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    last_day_of_month(first).map(|last| last.day())
}

/// Days from `start` to `end`, both included. A single day counts as 1.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// The range following a period that ends on `end`: from the next day to
/// the last day of that day's month.
pub fn next_period_after(end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let start = end.succ_opt()?;
    Some((start, last_day_of_month(start)?))
}
