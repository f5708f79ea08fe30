use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>` on
/// every request.
///
/// The header value is validated once at construction so a malformed token
/// fails at login rather than on each request.
pub struct Bearer<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> Bearer<C> {
    pub fn new(inner: C, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("Access token is not a valid header value")?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for Bearer<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}
