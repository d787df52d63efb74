//! Mock fetcher for testing.
//!
//! Canned responses keyed by exact URL, with injectable failures and an
//! ordered log of every fetch issued.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::fetcher::Fetcher;

enum Canned {
    Body(Vec<u8>),
    Status(u16),
    Transport,
}

/// Mock fetcher with canned responses and call tracking.
///
/// URLs without a canned response answer with HTTP 404.
///
/// # Example
///
/// ```rust
/// use mobilede_connector::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new()
///     .respond("https://example.com/search?page.number=1", "<searchResult/>")
///     .respond_status("https://example.com/search?page.number=2", 503);
/// ```
#[derive(Default)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, Canned>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url` (builder pattern).
    pub fn respond(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Canned::Body(body.into()));
        self
    }

    /// Answer `url` with a non-success HTTP status.
    pub fn respond_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Canned::Status(status));
        self
    }

    /// Fail `url` with a transport error.
    pub fn fail_transport(self, url: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Canned::Transport);
        self
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Every fetched URL, in call order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Clear the recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, _headers: &HashMap<String, String>) -> FetchResult<Vec<u8>> {
        self.calls.write().unwrap().push(url.to_string());

        let responses = self.responses.read().unwrap();
        match responses.get(url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(Canned::Transport) => Err(FetchError::Http {
                url: url.to_string(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
