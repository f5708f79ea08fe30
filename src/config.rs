//! Runtime settings read from the environment (and `.env`, loaded by the binary).

use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://connectapi.garmin.com";
pub const DEFAULT_TOKEN_URL: &str =
    "https://connectapi.garmin.com/oauth-service/oauth/exchange/user/2.0";

/// Connection and pacing settings.
///
/// | Variable                      | Default                |
/// |-------------------------------|------------------------|
/// | `GARMIN_BASE_URL`             | [`DEFAULT_BASE_URL`]   |
/// | `GARMIN_TOKEN_URL`            | [`DEFAULT_TOKEN_URL`]  |
/// | `GARMIN_ACCESS_TOKEN`         | unset                  |
/// | `FLOORS_REQUEST_TIMEOUT_SECS` | 30                     |
/// | `FLOORS_PAUSE_EVERY`          | 10, or 5 when sampling |
/// | `FLOORS_PAUSE_MS`             | 100                    |
/// | `FLOORS_PROGRESS_EVERY`       | 50                     |
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub token_url: String,
    /// Pre-issued bearer token; skips the credential exchange when set.
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    pub pause_every: Option<u64>,
    pub pause: Duration,
    pub progress_every: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            access_token: None,
            request_timeout: Duration::from_secs(30),
            pause_every: None,
            pause: Duration::from_millis(100),
            progress_every: 50,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset
    /// or empty keys.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable if a numeric value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            base_url: get("GARMIN_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            token_url: get("GARMIN_TOKEN_URL").unwrap_or(defaults.token_url),
            access_token: get("GARMIN_ACCESS_TOKEN"),
            request_timeout: parse_var(&get, "FLOORS_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            pause_every: parse_var(&get, "FLOORS_PAUSE_EVERY")?,
            pause: parse_var(&get, "FLOORS_PAUSE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.pause),
            progress_every: parse_var(&get, "FLOORS_PROGRESS_EVERY")?
                .unwrap_or(defaults.progress_every),
        })
    }

    /// Pause cadence for a walk with the given stride: denser sampling
    /// pauses less often.
    pub fn pause_every_for(&self, stride: u64) -> u64 {
        self.pause_every
            .unwrap_or(if stride > 1 { 5 } else { 10 })
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("Invalid value for {key}"))
}
