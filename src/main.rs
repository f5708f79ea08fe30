//! CLI entry point for floor_tally.
//!
//! Logs in to Garmin Connect, walks the requested year one daily summary at a
//! time, and prints the aggregated floor statistics as JSON on stdout.

mod infra;

use crate::infra::garmin::client::{Credentials, GarminClient};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use clap::error::ErrorKind;
use floor_tally::{
    aggregate::{WalkOptions, aggregate},
    config::Settings,
    output::{append_days, error_body, write_json, write_summary},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const USAGE: &str = "Usage: floor_tally <EMAIL> <PASSWORD> <YEAR>";

#[derive(Parser)]
#[command(name = "floor_tally", version)]
#[command(about = "Summarize a year of floors climbed from Garmin Connect", long_about = None)]
struct Cli {
    /// Garmin Connect account email
    #[arg(value_name = "EMAIL")]
    email: String,

    /// Garmin Connect account password
    #[arg(value_name = "PASSWORD")]
    password: String,

    /// Calendar year to summarize
    #[arg(value_name = "YEAR")]
    year: i32,

    /// Fetch every Nth day only and extrapolate totals
    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    sample_every: u64,

    /// Print a human-readable summary before the JSON
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// CSV file to append one row per visited day to
    #[arg(long, value_name = "PATH")]
    days_csv: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            write_json(std::io::stdout().lock(), &error_body(USAGE), false)?;
            std::process::exit(1);
        }
    };

    let _file_guard = init_tracing()?;

    let settings = Settings::from_env()?;
    let credentials = Credentials {
        email: cli.email,
        password: cli.password,
    };

    let client = match GarminClient::login(&settings, &credentials).await {
        Ok(client) => client,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Login failed");
            let body = error_body(&format!("Login failed: {e:#}"));
            write_json(std::io::stdout().lock(), &body, cli.pretty)?;
            return Ok(());
        }
    };

    info!(year = cli.year, sample_every = cli.sample_every, "Logged in");

    let today = Local::now().date_naive();
    let options = WalkOptions::from_settings(&settings, cli.sample_every, today);
    let walk = aggregate(&client, cli.year, &options).await?;
    let report = walk.report();

    if let Some(path) = &cli.days_csv {
        append_days(path, &walk.days)?;
        info!(path = %path, rows = walk.days.len(), "Day records written");
    }

    let mut stdout = std::io::stdout().lock();
    if cli.summary {
        write_summary(&mut stdout, &report)?;
    }
    write_json(&mut stdout, &report, cli.pretty)?;

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// Stdout is reserved for the JSON result, so nothing is logged there. If the
/// log file cannot be opened only the stderr layer is installed.
fn init_tracing() -> Result<Option<WorkerGuard>> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/floor_tally.log".to_string());

    let (json_layer, file_guard, file_error) = match open_log_file(&log_file_path) {
        Ok(file_appender) => {
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?),
                );
            (Some(json_layer), Some(file_guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    if let Some(e) = file_error {
        warn!(path = %log_file_path, error = %format!("{e:#}"), "File logging disabled");
    }

    Ok(file_guard)
}

/// Opens a daily-rolling appender for `log_file_path`, creating its directory.
fn open_log_file(log_file_path: &str) -> Result<RollingFileAppender> {
    let log_dir = Path::new(log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("floor_tally.log"));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(log_file_name.to_string_lossy())
        .build(log_dir)
        .with_context(|| format!("Cannot open log file '{log_file_path}'"))?;

    Ok(appender)
}
