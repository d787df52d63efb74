//! Page aggregation: walk a paginated search result and merge it into
//! one logical document.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::xml::parse_document;

/// Fetch every page of a search query and merge the ads in page order.
///
/// Pagination state is authoritative on the server side: after each page
/// the loop continues from the `currentPage`/`maxPages` the page itself
/// declares, not from a local counter. `total` is read from page 1 only.
/// Any fetch or parse failure aborts the whole aggregation; no partial
/// result is returned.
pub async fn aggregate<F: Fetcher + ?Sized>(
    fetcher: &F,
    base_uri: &str,
    headers: &HashMap<String, String>,
) -> Result<Document> {
    info!(uri = %base_uri, "aggregating paginated search result");

    let mut current_page: u64 = 1;
    let mut total: u64 = 0;
    let mut first_page = true;
    let mut ads = Vec::new();

    loop {
        let separator = if base_uri.contains('?') { '&' } else { '?' };
        let page_uri = format!("{base_uri}{separator}page.number={current_page}");

        let body = fetcher.fetch(&page_uri, headers).await?;
        let page = parse_document(&page_uri, &body)?;

        if first_page {
            total = page.child_u64("total");
            first_page = false;
        }

        let mut page_ads = 0;
        if let Some(container) = page.child("ads") {
            for ad in container.children_named("ad") {
                ads.push(ad.clone());
                page_ads += 1;
            }
        }

        // The page's own declared pagination state decides continuation
        let reported_page = page.child_u64("currentPage");
        let max_pages = page.child_u64("maxPages");

        debug!(
            uri = %page_uri,
            ads = page_ads,
            reported_page = reported_page,
            max_pages = max_pages,
            "page merged"
        );

        current_page = reported_page + 1;
        if current_page > max_pages {
            break;
        }
    }

    info!(uri = %base_uri, total = total, ads = ads.len(), "aggregation completed");
    Ok(Document::new(total, ads))
}
