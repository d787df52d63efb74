//! mobile.de Search API feed connector.
//!
//! Retrieves vehicle-listing records from the paginated mobile.de Search
//! API, optionally enriches each ad with its detail document, and
//! optionally normalizes selected fields into equipment entries. Every
//! stage consumes and produces the same [`Document`] shape, so stages
//! compose in sequence.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mobilede_connector::{ConnectorConfig, FeedSource, HttpFetcher, MobileDeConnector};
//!
//! let config = ConnectorConfig::new("https://services.mobile.de/search-api/search")
//!     .with_basic_auth("user", "secret")
//!     .with_accept("application/xml")
//!     .with_detail()
//!     .with_equipment_fields("airbag,features/abs,color");
//!
//! let connector = MobileDeConnector::new(HttpFetcher::new(), config);
//! let document = connector.fetch_document().await?;
//! println!("{} ads of {} total", document.len(), document.total);
//! ```
//!
//! # Modules
//!
//! - [`fetcher`] - the network seam ([`Fetcher`], [`HttpFetcher`])
//! - [`pipeline`] - the three pipeline stages
//! - [`xml`] - element tree, parsing, field selectors
//! - [`config`] - connector parameters and header assembly
//! - [`testing`] - [`MockFetcher`] for tests

pub mod config;
pub mod connector;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod testing;
pub mod xml;

// Re-export core types at crate root
pub use config::{ConnectorConfig, MultiValuePolicy, DETAIL_URL_TEMPLATE};
pub use connector::{FeedSource, MobileDeConnector, StageHook};
pub use document::Document;
pub use error::{ConfigError, ConnectorError, FetchError, ParseError, Result, SelectorError};
pub use fetcher::{Fetcher, HttpFetcher};
pub use pipeline::{aggregate, enrich, transform, transform_fields, Equipment, Stage};
pub use testing::MockFetcher;
pub use xml::{Element, FieldSelector};
