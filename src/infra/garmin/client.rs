use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use floor_tally::config::Settings;
use floor_tally::fetch::auth::Bearer;
use floor_tally::fetch::{BasicClient, HttpClient, fetch_json, post_json};
use floor_tally::services::summary_api::{DailySummaryApi, DaySummary};

/// Account credentials for the token exchange.
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialProfile {
    display_name: String,
}

/// Authenticated Garmin Connect client scoped to one user.
pub struct GarminClient<C> {
    http: Bearer<C>,
    base_url: Url,
    display_name: String,
}

impl GarminClient<BasicClient> {
    /// Authenticates and resolves the account's display name.
    ///
    /// Uses `settings.access_token` when present, otherwise exchanges the
    /// credentials for a token at `settings.token_url`.
    pub async fn login(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        let http = BasicClient::with_timeout(settings.request_timeout)?;

        let token = match &settings.access_token {
            Some(token) => token.clone(),
            None => exchange_token(&http, &settings.token_url, credentials).await?,
        };

        Self::connect(http, &settings.base_url, &token).await
    }
}

impl<C: HttpClient> GarminClient<C> {
    pub async fn connect(http: C, base_url: &str, token: &str) -> Result<Self> {
        let http = Bearer::new(http, token)?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid base URL '{base_url}'"))?;

        let profile_url = endpoint(&base_url, &["userprofile-service", "socialProfile"])?;
        let profile: SocialProfile = fetch_json(&http, profile_url.as_str())
            .await
            .context("Failed to load user profile")?;

        Ok(Self {
            http,
            base_url,
            display_name: profile.display_name,
        })
    }

    fn daily_summary_url(&self, date: NaiveDate) -> Result<Url> {
        let mut url = endpoint(
            &self.base_url,
            &["usersummary-service", "usersummary", "daily", self.display_name.as_str()],
        )?;
        url.query_pairs_mut()
            .append_pair("calendarDate", &date.format("%Y-%m-%d").to_string());
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> DailySummaryApi for GarminClient<C> {
    async fn day_summary(&self, date: NaiveDate) -> Result<DaySummary> {
        let url = self.daily_summary_url(date)?;
        let body: Value = fetch_json(&self.http, url.as_str()).await?;
        Ok(DaySummary::from_json(&body))
    }
}

async fn exchange_token<C: HttpClient>(
    http: &C,
    token_url: &str,
    credentials: &Credentials,
) -> Result<String> {
    let request = TokenRequest {
        username: &credentials.email,
        password: &credentials.password,
    };

    let response: TokenResponse = post_json(http, token_url, &request)
        .await
        .context("Token exchange failed")?;

    Ok(response.access_token)
}

/// Appends percent-encoded `segments` to `base`.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("Base URL '{base}' cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
