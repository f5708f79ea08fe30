mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::Result;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Issues a GET for `url` and decodes the JSON body.
///
/// # Errors
///
/// Fails on transport errors, non-2xx statuses (the body is included in the
/// message) and bodies that do not decode as `T`.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: &str) -> Result<T> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
    send_json(client, req).await
}

/// POSTs `body` as JSON to `url` and decodes the JSON response.
pub async fn post_json<C, B, T>(client: &C, url: &str, body: &B) -> Result<T>
where
    C: HttpClient,
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let mut req = reqwest::Request::new(reqwest::Method::POST, url.parse()?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());
    send_json(client, req).await
}

async fn send_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    req: reqwest::Request,
) -> Result<T> {
    let resp = client
        .execute(req)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send request: {}", e))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("API returned status {}: {}", status, body));
    }

    resp.json()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse response: {}", e))
}
