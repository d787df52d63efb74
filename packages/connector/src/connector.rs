//! Connector facade: the [`FeedSource`] capability and its mobile.de
//! implementation.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::ConnectorConfig;
use crate::document::Document;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::pipeline::{self, Stage};

/// A caller-supplied post-processing hook, applied after a pipeline stage.
///
/// Hooks run in registration order and are explicit per connector; there
/// is no ambient registry.
pub type StageHook = Box<dyn Fn(Stage, Document) -> Document + Send + Sync>;

/// A source of feed documents.
///
/// The pipeline's consumers depend on this capability, not on a concrete
/// connector type.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Run the pipeline and return the merged document.
    async fn fetch_document(&self) -> Result<Document>;

    /// Run the pipeline and return the result as an XML string.
    async fn fetch_raw(&self) -> Result<String> {
        Ok(self.fetch_document().await?.to_xml())
    }

    /// Whether the source can be queried at all. A specific query may
    /// still fail.
    fn is_available(&self) -> bool {
        true
    }
}

/// Connector for the mobile.de Search API XML feed.
///
/// Runs aggregate → (if configured) enrich → (if configured) transform,
/// applying registered stage hooks after each stage.
///
/// # Example
///
/// ```rust,ignore
/// use mobilede_connector::{ConnectorConfig, FeedSource, HttpFetcher, MobileDeConnector};
///
/// let config = ConnectorConfig::new("https://services.mobile.de/search-api/search")
///     .with_basic_auth("user", "secret")
///     .with_detail()
///     .with_equipment_fields("airbag,color");
/// let connector = MobileDeConnector::new(HttpFetcher::new(), config);
/// let document = connector.fetch_document().await?;
/// ```
pub struct MobileDeConnector<F> {
    fetcher: F,
    config: ConnectorConfig,
    hooks: Vec<StageHook>,
}

impl<F: Fetcher> MobileDeConnector<F> {
    /// Create a connector over a fetcher and a configuration.
    pub fn new(fetcher: F, config: ConnectorConfig) -> Self {
        Self {
            fetcher,
            config,
            hooks: Vec::new(),
        }
    }

    /// Register a post-processing hook (builder pattern).
    pub fn with_hook(
        mut self,
        hook: impl Fn(Stage, Document) -> Document + Send + Sync + 'static,
    ) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// The configuration this connector runs with.
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    fn apply_hooks(&self, stage: Stage, mut doc: Document) -> Document {
        for hook in &self.hooks {
            doc = hook(stage, doc);
        }
        doc
    }

    async fn run(&self) -> Result<Document> {
        self.config.validate()?;
        let headers = self.config.request_headers();

        if let Some(encoding) = self.config.declared_encoding() {
            // Charset reconciliation is the caller's concern
            debug!(encoding = %encoding, "source charset declared");
        }

        let mut doc = pipeline::aggregate(&self.fetcher, &self.config.uri, &headers).await?;
        doc = self.apply_hooks(Stage::Aggregate, doc);

        if self.config.get_detail {
            doc = pipeline::enrich(&self.fetcher, doc, &headers, &self.config).await?;
            doc = self.apply_hooks(Stage::Enrich, doc);
        }

        if let Some(fields) = &self.config.equipment_fields {
            doc = pipeline::transform_fields(doc, fields, self.config.multi_value_policy)?;
            doc = self.apply_hooks(Stage::Transform, doc);
        }

        info!(
            fetcher = self.fetcher.name(),
            total = doc.total,
            ads = doc.len(),
            "feed pipeline completed"
        );
        Ok(doc)
    }
}

#[async_trait]
impl<F: Fetcher> FeedSource for MobileDeConnector<F> {
    async fn fetch_document(&self) -> Result<Document> {
        self.run().await
    }
}
