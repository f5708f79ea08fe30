use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::calendar::{WEEKDAY_ABBREVIATIONS, month_index, weekday_index};
use crate::services::summary_api::DaySummary;

/// Highest single-day floors-up seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BestDay {
    pub date: Option<NaiveDate>,
    pub floors: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeekdayBucket {
    pub total: f64,
    pub count: usize,
}

impl WeekdayBucket {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Running sums for one walk over a year.
#[derive(Debug, Clone, Default)]
pub struct FloorTally {
    pub total_floors_up: f64,
    pub total_floors_down: f64,
    pub days_visited: usize,
    pub days_with_data: usize,
    pub best_day: BestDay,

    // January = 0
    pub monthly_floors: [f64; 12],
    // Monday = 0
    pub weekday_floors: [WeekdayBucket; 7],
}

impl FloorTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one visited date into the tally.
    ///
    /// `None` means the fetch for `date` failed: the day still counts as
    /// visited but contributes nothing. Only days with floors-up > 0 feed
    /// the derived tables and the best-day record.
    pub fn record(&mut self, date: NaiveDate, summary: Option<&DaySummary>) {
        self.days_visited += 1;

        let Some(summary) = summary else {
            return;
        };

        let up = summary.floors_ascended;
        self.total_floors_up += up;
        self.total_floors_down += summary.floors_descended;

        if up <= 0.0 {
            return;
        }

        self.days_with_data += 1;
        self.monthly_floors[month_index(date)] += up;

        let bucket = &mut self.weekday_floors[weekday_index(date)];
        bucket.total += up;
        bucket.count += 1;

        // strict: ties keep the earlier date
        if up > self.best_day.floors {
            self.best_day = BestDay {
                date: Some(date),
                floors: up,
            };
        }
    }

    /// Average floors-up per day with data, unscaled.
    pub fn avg_daily_floors(&self) -> f64 {
        if self.days_with_data == 0 {
            0.0
        } else {
            self.total_floors_up / self.days_with_data as f64
        }
    }

    /// Snapshots the tally into a report.
    ///
    /// With `stride > 1` the totals and monthly sums are multiplied by
    /// `stride` as a linear estimate of the unsampled days. Best day, days
    /// with data and the averages stay as observed.
    pub fn report(&self, year: i32, stride: u64) -> FloorReport {
        let stride = stride.max(1);
        let scale = stride as f64;

        FloorReport {
            success: true,
            year,
            sampling_stride: stride,
            days_visited: self.days_visited,
            total_floors_ascended: (self.total_floors_up * scale) as i64,
            total_floors_descended: (self.total_floors_down * scale) as i64,
            days_with_data: self.days_with_data,
            avg_daily_floors: round1(self.avg_daily_floors()),
            best_day: BestDayReport {
                date: self.best_day.date,
                floors: self.best_day.floors as i64,
            },
            monthly_floors: MonthlyFloors(self.monthly_floors.map(|m| (m * scale) as i64)),
            weekday_averages: WeekdayAverages(self.weekday_floors.map(|b| round1(b.average()))),
        }
    }
}

/// Rounds to one decimal place, nearest with ties to even on the exact
/// binary value (1.25 -> 1.2, 0.35 -> 0.3).
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BestDayReport {
    pub date: Option<NaiveDate>,
    pub floors: i64,
}

/// Floors-up per month, serialized as `{"1": .., "12": ..}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyFloors(pub [i64; 12]);

impl MonthlyFloors {
    /// Floors for `month` (1-12).
    pub fn get(&self, month: u32) -> Option<i64> {
        let idx = usize::try_from(month).ok()?.checked_sub(1)?;
        self.0.get(idx).copied()
    }

    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }
}

impl Serialize for MonthlyFloors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, floors) in self.0.iter().enumerate() {
            map.serialize_entry(&(i + 1).to_string(), floors)?;
        }
        map.end()
    }
}

/// Average floors-up per active weekday, serialized Monday first.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayAverages(pub [f64; 7]);

impl Serialize for WeekdayAverages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, avg) in WEEKDAY_ABBREVIATIONS.iter().zip(self.0.iter()) {
            map.serialize_entry(name, avg)?;
        }
        map.end()
    }
}

/// Immutable result of an aggregation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorReport {
    pub success: bool,
    pub year: i32,
    pub sampling_stride: u64,
    pub days_visited: usize,
    pub total_floors_ascended: i64,
    pub total_floors_descended: i64,
    pub days_with_data: usize,
    pub avg_daily_floors: f64,
    pub best_day: BestDayReport,
    pub monthly_floors: MonthlyFloors,
    pub weekday_averages: WeekdayAverages,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn up(floors: f64) -> DaySummary {
        DaySummary::new(floors, floors)
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(10.0 / 3.0), 3.3);
        assert_eq!(round1(2.96), 3.0);
    }

    #[test]
    fn test_round1_ties_go_to_even() {
        assert_eq!(round1(1.25), 1.2);
        assert_eq!(round1(0.35), 0.3);
        assert_eq!(round1(7.0 / 20.0), 0.3);
        assert_eq!(round1(1.75), 1.8);
    }

    #[test]
    fn test_average_rounding_on_tie() {
        let mut tally = FloorTally::new();
        // Mondays, 5 floors over 4 active days
        tally.record(ymd(2025, 1, 6), Some(&up(2.0)));
        tally.record(ymd(2025, 1, 13), Some(&up(1.0)));
        tally.record(ymd(2025, 1, 20), Some(&up(1.0)));
        tally.record(ymd(2025, 1, 27), Some(&up(1.0)));

        let report = tally.report(2025, 1);
        assert_eq!(report.avg_daily_floors, 1.2);
        assert_eq!(report.weekday_averages.0[0], 1.2);
    }

    #[test]
    fn test_empty_tally_reports_zeros() {
        let mut tally = FloorTally::new();
        tally.record(ymd(2025, 1, 1), Some(&DaySummary::default()));
        tally.record(ymd(2025, 1, 2), None);

        let report = tally.report(2025, 1);

        assert_eq!(report.days_visited, 2);
        assert_eq!(report.days_with_data, 0);
        assert_eq!(report.avg_daily_floors, 0.0);
        assert_eq!(report.best_day, BestDayReport { date: None, floors: 0 });
        assert_eq!(report.monthly_floors, MonthlyFloors([0; 12]));
        assert_eq!(report.weekday_averages, WeekdayAverages([0.0; 7]));
        assert_eq!(report.total_floors_ascended, 0);
    }

    #[test]
    fn test_single_day() {
        let mut tally = FloorTally::new();
        tally.record(ymd(2025, 1, 15), Some(&DaySummary::new(42.0, 40.0)));

        let report = tally.report(2025, 1);

        assert_eq!(report.total_floors_ascended, 42);
        assert_eq!(report.total_floors_descended, 40);
        assert_eq!(report.monthly_floors.get(1), Some(42));
        assert_eq!(report.best_day.date, Some(ymd(2025, 1, 15)));
        assert_eq!(report.best_day.floors, 42);
        assert_eq!(report.avg_daily_floors, 42.0);
        // Wednesday
        assert_eq!(report.weekday_averages.0[2], 42.0);
    }

    #[test]
    fn test_best_day_tie_keeps_earlier_date() {
        let mut tally = FloorTally::new();
        tally.record(ymd(2025, 2, 1), Some(&up(20.0)));
        tally.record(ymd(2025, 2, 2), Some(&up(30.0)));
        tally.record(ymd(2025, 2, 3), Some(&up(30.0)));
        tally.record(ymd(2025, 2, 4), Some(&up(10.0)));

        assert_eq!(tally.best_day.date, Some(ymd(2025, 2, 2)));
        assert_eq!(tally.best_day.floors, 30.0);
    }

    #[test]
    fn test_zero_floor_day_excluded_from_derived_stats() {
        let mut tally = FloorTally::new();
        tally.record(ymd(2025, 3, 3), Some(&DaySummary::new(0.0, 5.0)));

        assert_eq!(tally.days_with_data, 0);
        assert_eq!(tally.total_floors_down, 5.0);
        assert_eq!(tally.weekday_floors[0].count, 0);
    }

    #[test]
    fn test_monthly_sum_matches_total_before_scaling() {
        let mut tally = FloorTally::new();
        let start = ymd(2025, 1, 1);
        for (i, date) in start.iter_days().take(200).enumerate() {
            tally.record(date, Some(&up((i % 17) as f64)));
        }

        let monthly: f64 = tally.monthly_floors.iter().sum();
        assert_eq!(monthly, tally.total_floors_up);
        assert!(tally.days_with_data <= tally.days_visited);
    }

    #[test]
    fn test_weekday_average() {
        let mut tally = FloorTally::new();
        // Mondays
        tally.record(ymd(2025, 1, 6), Some(&up(10.0)));
        tally.record(ymd(2025, 1, 13), Some(&up(15.0)));
        tally.record(ymd(2025, 1, 20), Some(&up(6.0)));

        let report = tally.report(2025, 1);
        assert_eq!(report.weekday_averages.0[0], 10.3);
        assert_eq!(report.avg_daily_floors, 10.3);
    }

    #[test]
    fn test_stride_extrapolates_totals_and_months_only() {
        let mut tally = FloorTally::new();
        tally.record(ymd(2025, 1, 1), Some(&DaySummary::new(10.0, 8.0)));
        tally.record(ymd(2025, 1, 4), Some(&DaySummary::new(20.0, 16.0)));
        tally.record(ymd(2025, 2, 3), Some(&DaySummary::new(5.0, 5.0)));

        let raw = tally.report(2025, 1);
        let scaled = tally.report(2025, 3);

        assert_eq!(scaled.total_floors_ascended, raw.total_floors_ascended * 3);
        assert_eq!(scaled.total_floors_descended, raw.total_floors_descended * 3);
        assert_eq!(scaled.monthly_floors.get(1), Some(90));
        assert_eq!(scaled.monthly_floors.get(2), Some(15));

        assert_eq!(scaled.best_day, raw.best_day);
        assert_eq!(scaled.days_with_data, raw.days_with_data);
        assert_eq!(scaled.avg_daily_floors, raw.avg_daily_floors);
        assert_eq!(scaled.weekday_averages, raw.weekday_averages);
        assert_eq!(scaled.sampling_stride, 3);
    }

    #[test]
    fn test_fractional_floors_truncate_in_report() {
        let mut tally = FloorTally::new();
        tally.record(ymd(2025, 5, 5), Some(&DaySummary::new(12.7, 3.9)));

        let report = tally.report(2025, 1);
        assert_eq!(report.total_floors_ascended, 12);
        assert_eq!(report.total_floors_descended, 3);
        assert_eq!(report.best_day.floors, 12);
        assert_eq!(report.avg_daily_floors, 12.7);
    }

    #[test]
    fn test_monthly_get_bounds() {
        let months = MonthlyFloors([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(months.get(0), None);
        assert_eq!(months.get(12), Some(12));
        assert_eq!(months.get(13), None);
        assert_eq!(months.total(), 78);
    }
}
