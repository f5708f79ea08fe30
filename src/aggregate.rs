//! The year walk: one summary fetch per sampled date, folded into a [`FloorTally`].

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::calendar::{sample_dates, year_range};
use crate::config::Settings;
use crate::services::summary_api::{DailySummaryApi, DaySummary};
use crate::stats::{FloorReport, FloorTally};

/// Knobs for a single walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOptions {
    /// Visit every `stride`-th day; totals are extrapolated when > 1.
    pub stride: u64,
    /// Upper bound for the walk, normally the local date.
    pub today: NaiveDate,
    /// Sleep for `pause` after this many visited days (0 disables).
    pub pause_every: u64,
    pub pause: Duration,
    /// Log progress after this many visited days (0 disables).
    pub progress_every: u64,
}

impl WalkOptions {
    /// Options with no pacing and no progress logging.
    pub fn new(stride: u64, today: NaiveDate) -> Self {
        Self {
            stride: stride.max(1),
            today,
            pause_every: 0,
            pause: Duration::ZERO,
            progress_every: 0,
        }
    }

    pub fn from_settings(settings: &Settings, stride: u64, today: NaiveDate) -> Self {
        let stride = stride.max(1);
        Self {
            stride,
            today,
            pause_every: settings.pause_every_for(stride),
            pause: settings.pause,
            progress_every: settings.progress_every,
        }
    }
}

/// One visited date, as written to the per-day CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// `false` when the fetch failed; the floor columns are then zero.
    pub fetched: bool,
    pub floors_ascended: f64,
    pub floors_descended: f64,
}

impl DayRecord {
    fn new(date: NaiveDate, summary: Option<&DaySummary>) -> Self {
        let summary = summary.copied();
        Self {
            date,
            fetched: summary.is_some(),
            floors_ascended: summary.map_or(0.0, |s| s.floors_ascended),
            floors_descended: summary.map_or(0.0, |s| s.floors_descended),
        }
    }
}

/// Everything a completed walk produced.
#[derive(Debug, Clone)]
pub struct YearWalk {
    pub year: i32,
    pub stride: u64,
    pub tally: FloorTally,
    pub days: Vec<DayRecord>,
}

impl YearWalk {
    pub fn report(&self) -> FloorReport {
        self.tally.report(self.year, self.stride)
    }
}

/// Walks `year` up to `options.today`, fetching one summary per sampled date.
///
/// Per-day failures never abort the walk: the day is recorded as visited
/// with no data and the walk moves on.
///
/// # Errors
///
/// Returns an error only if `year` cannot be represented as a date.
#[tracing::instrument(skip(api, options), fields(stride = options.stride, today = %options.today))]
pub async fn aggregate<A>(api: &A, year: i32, options: &WalkOptions) -> Result<YearWalk>
where
    A: DailySummaryApi + ?Sized,
{
    let stride = options.stride.max(1);
    let mut walk = YearWalk {
        year,
        stride,
        tally: FloorTally::new(),
        days: Vec::new(),
    };

    let Some((start, end)) = year_range(year, options.today)? else {
        info!("Year has not started yet, nothing to fetch");
        return Ok(walk);
    };

    info!(%start, %end, "Fetching daily summaries");

    for date in sample_dates(start, end, stride) {
        let summary = match api.day_summary(date).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                debug!(%date, error = %e, "Day summary unavailable");
                None
            }
        };

        walk.tally.record(date, summary.as_ref());
        walk.days.push(DayRecord::new(date, summary.as_ref()));

        let visited = walk.tally.days_visited as u64;

        if options.progress_every > 0 && visited % options.progress_every == 0 {
            info!(visited, "Progress");
        }

        let pacing = options.pause_every > 0 && !options.pause.is_zero();
        if pacing && visited % options.pause_every == 0 {
            tokio::time::sleep(options.pause).await;
        }
    }

    info!(
        days_visited = walk.tally.days_visited,
        days_with_data = walk.tally.days_with_data,
        "Walk complete"
    );

    Ok(walk)
}
