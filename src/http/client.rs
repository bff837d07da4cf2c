//! reqwest-backed transport.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{HttpGet, HttpResponse};
use crate::error::Result;

/// Transport wrapping a `reqwest::Client` that already carries the session
/// headers. Cloning is cheap and clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpGet for HttpClient {
    /// Performs a GET request and returns the status and body as-is.
    /// Non-2xx statuses are data here, not errors.
    #[tracing::instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!("GET {}...", url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}
