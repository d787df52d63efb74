//! Typed errors for the connector library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while running the feed pipeline.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A page or detail fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A response body could not be parsed
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    /// A field selector is structurally invalid
    #[error("selector failed: {0}")]
    Selector(#[from] SelectorError),

    /// Connector configuration is unusable
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the [`Fetcher`](crate::fetcher::Fetcher) seam.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connection, timeout, TLS, ...)
    #[error("HTTP request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status code
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Errors raised while parsing feed documents.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not well-formed XML
    #[error("malformed XML from {url}: {source}")]
    Xml {
        url: String,
        #[source]
        source: quick_xml::Error,
    },

    /// The body is not valid UTF-8
    #[error("response from {url} is not valid UTF-8")]
    Encoding { url: String },

    /// An ad is missing its required identifier
    #[error("ad at position {index} has no mobileAdId")]
    MissingAdId { index: usize },

    /// The document does not have the expected envelope shape
    #[error("unexpected document shape: {reason}")]
    UnexpectedShape { reason: String },
}

/// Errors raised while parsing field selectors.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// The selector string cannot be evaluated
    #[error("invalid selector {selector:?}: {reason}")]
    Invalid { selector: String, reason: String },
}

/// Errors raised by configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The mandatory feed URI is missing
    #[error("no feed URI defined")]
    MissingUri,

    /// The feed URI is not a well-formed URL
    #[error("invalid feed URI {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// The detail URL template has no `{mobileAdId}` placeholder
    #[error("detail URL template {template:?} has no {{mobileAdId}} placeholder")]
    BadDetailTemplate { template: String },
}

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
