use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared requests; wrappers in [`crate::fetch::auth`] decorate it.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
