//! Garmin Connect implementation of [`DailySummaryApi`](floor_tally::services::summary_api::DailySummaryApi).

pub mod client;
