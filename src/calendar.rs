//! Date-range helpers for walking a calendar year.

use anyhow::{Result, anyhow};
use chrono::{Datelike, Days, NaiveDate};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monday first, matching [`weekday_index`].
pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Returns `[Jan 1, min(Dec 31, today)]` for `year`, or `None` when the year
/// has not started yet.
///
/// # Errors
///
/// Returns an error if `year` is outside the range chrono can represent.
pub fn year_range(year: i32, today: NaiveDate) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| anyhow!("Year {year} is out of range"))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| anyhow!("Year {year} is out of range"))?;

    let end = last.min(today);
    if end < start {
        return Ok(None);
    }

    Ok(Some((start, end)))
}

/// Yields `start`, `start + stride`, ... up to and including `end`.
///
/// A `stride` of zero is treated as one.
pub fn sample_dates(start: NaiveDate, end: NaiveDate, stride: u64) -> impl Iterator<Item = NaiveDate> {
    let step = Days::new(stride.max(1));
    std::iter::successors(Some(start), move |d| d.checked_add_days(step))
        .take_while(move |d| *d <= end)
}

/// Zero-based month index (January = 0).
pub fn month_index(date: NaiveDate) -> usize {
    date.month0() as usize
}

/// Zero-based weekday index (Monday = 0).
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_past_year_covers_whole_year() {
        let range = year_range(2024, ymd(2025, 6, 1)).unwrap();
        assert_eq!(range, Some((ymd(2024, 1, 1), ymd(2024, 12, 31))));
    }

    #[test]
    fn test_current_year_stops_at_today() {
        let range = year_range(2025, ymd(2025, 3, 10)).unwrap();
        assert_eq!(range, Some((ymd(2025, 1, 1), ymd(2025, 3, 10))));
    }

    #[test]
    fn test_future_year_is_empty() {
        assert_eq!(year_range(2030, ymd(2025, 3, 10)).unwrap(), None);
    }

    #[test]
    fn test_new_years_day_is_single_day() {
        let range = year_range(2025, ymd(2025, 1, 1)).unwrap();
        assert_eq!(range, Some((ymd(2025, 1, 1), ymd(2025, 1, 1))));
    }

    #[test]
    fn test_out_of_range_year_errors() {
        assert!(year_range(i32::MAX, ymd(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_sample_every_day_in_leap_year() {
        let count = sample_dates(ymd(2024, 1, 1), ymd(2024, 12, 31), 1).count();
        assert_eq!(count, 366);
    }

    #[test]
    fn test_sample_every_third_day() {
        let dates: Vec<_> = sample_dates(ymd(2025, 1, 1), ymd(2025, 1, 10), 3).collect();
        assert_eq!(
            dates,
            vec![ymd(2025, 1, 1), ymd(2025, 1, 4), ymd(2025, 1, 7), ymd(2025, 1, 10)]
        );

        // 365 days sampled every 3rd day starting on day 0
        assert_eq!(sample_dates(ymd(2025, 1, 1), ymd(2025, 12, 31), 3).count(), 122);
    }

    #[test]
    fn test_zero_stride_behaves_like_one() {
        assert_eq!(sample_dates(ymd(2025, 1, 1), ymd(2025, 1, 5), 0).count(), 5);
    }

    #[test]
    fn test_indices() {
        // 2025-01-15 was a Wednesday
        let date = ymd(2025, 1, 15);
        assert_eq!(month_index(date), 0);
        assert_eq!(weekday_index(date), 2);
        assert_eq!(WEEKDAY_ABBREVIATIONS[weekday_index(date)], "Wed");
        assert_eq!(MONTH_ABBREVIATIONS[month_index(ymd(2025, 12, 1))], "Dec");
    }
}
