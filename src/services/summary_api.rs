//! Trait and types for reading daily activity summaries from a fitness platform.

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::Value;

/// The floor counters of a single day's summary.
///
/// Absent, `null` or non-numeric counters read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DaySummary {
    pub floors_ascended: f64,
    pub floors_descended: f64,
}

impl DaySummary {
    pub fn new(floors_ascended: f64, floors_descended: f64) -> Self {
        Self {
            floors_ascended,
            floors_descended,
        }
    }

    /// Extracts the floor counters from a raw daily-summary payload.
    pub fn from_json(value: &Value) -> Self {
        Self {
            floors_ascended: counter(&value["floorsAscended"]),
            floors_descended: counter(&value["floorsDescended"]),
        }
    }
}

fn counter(value: &Value) -> f64 {
    value.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Abstraction over a provider of per-day summaries (e.g., Garmin Connect).
#[async_trait::async_trait]
pub trait DailySummaryApi: Send + Sync {
    /// Fetches the summary for `date`.
    async fn day_summary(&self, date: NaiveDate) -> Result<DaySummary>;
}
