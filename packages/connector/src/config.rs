//! Connector configuration.
//!
//! Mirrors the parameter set the feed has always been driven by: the feed
//! URI, credentials and header material, and the two optional pipeline
//! stages (detail enrichment, equipment transformation). Deserializes
//! from the historical kebab-case parameter names, so existing call
//! definitions port over unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;

/// Endpoint template for per-ad detail fetches.
pub const DETAIL_URL_TEMPLATE: &str = "https://services.mobile.de/search-api/ad/{mobileAdId}";

/// How multi-valued selector matches are turned into equipment entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiValuePolicy {
    /// One equipment entry per extracted value, plus a per-ad
    /// `equipmentCollection` summary. Canonical behavior.
    #[default]
    Expand,
    /// One equipment entry per matched node with all values comma-joined,
    /// and no `equipmentCollection`. Behavior of the earliest revision of
    /// the transform, kept for consumers that still expect it.
    Collapse,
}

/// Parameters for one connector invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConnectorConfig {
    /// Base URI of the search query (page 1).
    pub uri: String,

    /// Extra headers sent with every request.
    pub headers: HashMap<String, String>,

    /// Basic-Auth credentials.
    pub username: Option<String>,
    pub password: Option<String>,

    /// Value for the `Accept` header.
    pub accept: Option<String>,

    /// Legacy `User-Agent` override; prefer `headers`.
    #[serde(rename = "useragent")]
    pub user_agent: Option<String>,

    /// Enrich every ad with a detail fetch.
    pub get_detail: bool,

    /// Comma-separated selector list; enables the equipment transform.
    pub equipment_fields: Option<String>,

    /// Declared source charset. Charset reconciliation happens outside
    /// the pipeline; the value is carried for the caller.
    pub encoding: Option<String>,

    /// Concurrent detail fetches (1 = sequential).
    pub detail_concurrency: usize,

    /// Multi-value handling in the equipment transform.
    pub multi_value_policy: MultiValuePolicy,

    /// Detail endpoint template; must contain `{mobileAdId}`.
    pub detail_url_template: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            headers: HashMap::new(),
            username: None,
            password: None,
            accept: None,
            user_agent: None,
            get_detail: false,
            equipment_fields: None,
            encoding: None,
            detail_concurrency: 1,
            multi_value_policy: MultiValuePolicy::default(),
            detail_url_template: DETAIL_URL_TEMPLATE.to_string(),
        }
    }
}

impl ConnectorConfig {
    /// Create a config for a search URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set Basic-Auth credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the `Accept` header.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Set the legacy `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable per-ad detail enrichment.
    pub fn with_detail(mut self) -> Self {
        self.get_detail = true;
        self
    }

    /// Enable the equipment transform for the given selector list.
    pub fn with_equipment_fields(mut self, fields: impl Into<String>) -> Self {
        self.equipment_fields = Some(fields.into());
        self
    }

    /// Set the declared source charset.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set the number of concurrent detail fetches.
    pub fn with_detail_concurrency(mut self, concurrency: usize) -> Self {
        self.detail_concurrency = concurrency.max(1);
        self
    }

    /// Set the multi-value policy.
    pub fn with_multi_value_policy(mut self, policy: MultiValuePolicy) -> Self {
        self.multi_value_policy = policy;
        self
    }

    /// Override the detail endpoint template.
    pub fn with_detail_url_template(mut self, template: impl Into<String>) -> Self {
        self.detail_url_template = template.into();
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri.is_empty() {
            return Err(ConfigError::MissingUri);
        }
        url::Url::parse(&self.uri).map_err(|source| ConfigError::InvalidUri {
            uri: self.uri.clone(),
            source,
        })?;
        if !self.detail_url_template.contains("{mobileAdId}") {
            return Err(ConfigError::BadDetailTemplate {
                template: self.detail_url_template.clone(),
            });
        }
        Ok(())
    }

    /// Assemble the header map sent with every request.
    ///
    /// Credentials, `Accept` and the legacy `User-Agent` override any
    /// identically-named entry in `headers`.
    pub fn request_headers(&self) -> HashMap<String, String> {
        let mut headers = self.headers.clone();
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            let auth = STANDARD.encode(format!("{username}:{password}"));
            headers.insert("Authorization".to_string(), format!("Basic {auth}"));
        }
        if let Some(accept) = &self.accept {
            headers.insert("Accept".to_string(), accept.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            headers.insert("User-Agent".to_string(), user_agent.clone());
        }
        headers
    }

    /// The declared source charset, if any.
    pub fn declared_encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Detail endpoint URL for one ad.
    pub fn detail_url(&self, mobile_ad_id: &str) -> String {
        self.detail_url_template.replace("{mobileAdId}", mobile_ad_id)
    }
}
