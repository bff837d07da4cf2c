//! HTTP transport seam used by every lookup and search.

mod client;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpClient;

/// A response reduced to what the status mapping needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends authenticated GET requests.
///
/// Implementations carry their own credentials and default headers and must
/// be safe to share between concurrent fetches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}
