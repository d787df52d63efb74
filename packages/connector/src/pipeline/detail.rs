//! Detail enrichment: replace every ad with its full detail document.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::ConnectorConfig;
use crate::document::Document;
use crate::error::{ConnectorError, ParseError, Result};
use crate::fetcher::Fetcher;
use crate::xml::{parse_document, Element};

/// Fetch the detail document for every ad and replace the ad wholesale.
///
/// Nothing of the original ad survives; the fetched detail root takes its
/// place. Fetches run with at most `detail_concurrency` in flight, and the
/// enriched document keeps the exact ad order of the input. Any single
/// failure aborts the whole call; no partially enriched document is
/// returned.
pub async fn enrich<F: Fetcher + ?Sized>(
    fetcher: &F,
    doc: Document,
    headers: &HashMap<String, String>,
    config: &ConnectorConfig,
) -> Result<Document> {
    info!(
        ads = doc.len(),
        concurrency = config.detail_concurrency,
        "enriching ads with detail documents"
    );

    // Resolve every detail URL up front so a missing id fails before any
    // network call is spent
    let urls = doc
        .ads
        .iter()
        .enumerate()
        .map(|(index, ad)| {
            let id = ad
                .child_text("mobileAdId")
                .filter(|id| !id.trim().is_empty())
                .ok_or(ParseError::MissingAdId { index })?;
            Ok(config.detail_url(id.trim()))
        })
        .collect::<std::result::Result<Vec<_>, ParseError>>()?;

    let concurrency = config.detail_concurrency.max(1);
    let fetches = urls.into_iter().map(|url| async move {
        let body = fetcher.fetch(&url, headers).await?;
        let detail = parse_document(&url, &body)?;
        debug!(url = %url, "ad detail fetched");
        Ok::<Element, ConnectorError>(detail)
    });

    // `buffered` keeps completion results in submission order, so the
    // enriched ads line up with the input ads
    let ads: Vec<Element> = stream::iter(fetches)
        .buffered(concurrency)
        .try_collect()
        .await?;

    Ok(Document::new(doc.total, ads))
}
