//! Fetcher seam between the pipeline and the network.
//!
//! The pipeline never talks to the network directly; every page and
//! detail request goes through this trait. Retry, backoff and timeout
//! policy live in the implementation, not in the pipeline.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};

/// Fetches raw bytes from a URL with a fixed header set.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body at `url`, sending `headers` with the request.
    async fn fetch(&self, url: &str, headers: &HashMap<String, String>) -> FetchResult<Vec<u8>>;

    /// Fetcher name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// HTTP fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a fetcher with a 30 second request timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Use a caller-supplied client (custom timeouts, proxies, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &HashMap<String, String>) -> FetchResult<Vec<u8>> {
        debug!(url = %url, "HTTP fetch starting");

        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            FetchError::Http {
                url: url.to_string(),
                source: Box::new(e),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "HTTP request rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Http {
            url: url.to_string(),
            source: Box::new(e),
        })?;

        debug!(url = %url, bytes = body.len(), "HTTP fetch completed");
        Ok(body.to_vec())
    }

    fn name(&self) -> &str {
        "http"
    }
}
