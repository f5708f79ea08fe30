//! Output formatting and persistence for floor reports.
//!
//! Supports the JSON contract on stdout, a human-readable summary block, and
//! CSV export of the visited days.

use anyhow::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::aggregate::DayRecord;
use crate::calendar::{MONTH_ABBREVIATIONS, WEEKDAY_ABBREVIATIONS};
use crate::stats::FloorReport;
use csv::WriterBuilder;

const RULE: &str = "==================================================";

/// Writes `value` as a single JSON document followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// The `{"error": ...}` object emitted when no report can be produced.
pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

/// Writes the human-readable summary that precedes the JSON output.
///
/// Monthly and weekday lines are listed only for entries with data.
pub fn write_summary<W: Write>(mut w: W, report: &FloorReport) -> Result<()> {
    writeln!(w)?;
    writeln!(w, "{RULE}")?;
    writeln!(w, "FLOOR DATA SUMMARY FOR {}", report.year)?;
    writeln!(w, "{RULE}")?;
    writeln!(w)?;
    writeln!(w, "Total days analyzed: {}", report.days_visited)?;
    writeln!(w, "Days with floor data: {}", report.days_with_data)?;
    if report.sampling_stride > 1 {
        writeln!(
            w,
            "(sampled every {} days; totals are estimates)",
            report.sampling_stride
        )?;
    }
    writeln!(w)?;
    writeln!(w, "TOTAL FLOORS ASCENDED: {}", report.total_floors_ascended)?;
    writeln!(w, "TOTAL FLOORS DESCENDED: {}", report.total_floors_descended)?;

    if report.days_with_data > 0 {
        writeln!(w)?;
        writeln!(
            w,
            "Average floors per active day: {:.1}",
            report.avg_daily_floors
        )?;
        if let Some(date) = report.best_day.date {
            writeln!(w, "Best day: {} with {} floors", date, report.best_day.floors)?;
        }

        writeln!(w)?;
        writeln!(w, "--- Monthly breakdown ---")?;
        for (name, floors) in MONTH_ABBREVIATIONS.iter().zip(report.monthly_floors.0.iter()) {
            if *floors > 0 {
                writeln!(w, "  {name}: {floors} floors")?;
            }
        }

        writeln!(w)?;
        writeln!(w, "--- Weekday averages ---")?;
        for (name, avg) in WEEKDAY_ABBREVIATIONS
            .iter()
            .zip(report.weekday_averages.0.iter())
        {
            if *avg > 0.0 {
                writeln!(w, "  {name}: {avg:.1} floors/day")?;
            }
        }
    }

    writeln!(w)?;
    writeln!(w, "--- JSON Output ---")?;
    Ok(())
}

/// Appends one CSV row per [`DayRecord`] to `path`.
///
/// Creates the file with headers if it does not already exist.
pub fn append_days(path: &str, days: &[DayRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = days.len(), "Appending day records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // headers only on a fresh file
        .from_writer(file);

    for day in days {
        writer.serialize(day)?;
    }
    writer.flush()?;

    Ok(())
}
