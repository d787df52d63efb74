//! Integration tests for the full feed pipeline.
//!
//! These tests run aggregate → enrich → transform end to end against a
//! mock fetcher and verify the output document shape, the fetch order,
//! and the per-stage hooks.

use mobilede_connector::{
    ConnectorConfig, ConnectorError, Document, Element, FeedSource, MobileDeConnector,
    MultiValuePolicy, Stage,
};
use mobilede_connector::testing::MockFetcher;

const SEARCH_URI: &str = "https://services.mobile.de/search-api/search?damageUnrepaired=false";

/// Two search pages plus a detail document per ad.
fn full_feed_fetcher() -> MockFetcher {
    MockFetcher::new()
        .respond(
            format!("{SEARCH_URI}&page.number=1"),
            "<searchResult><total>3</total><currentPage>1</currentPage><maxPages>2</maxPages><ads>\
             <ad><mobileAdId>11</mobileAdId><stale>yes</stale></ad>\
             <ad><mobileAdId>22</mobileAdId></ad>\
             </ads></searchResult>",
        )
        .respond(
            format!("{SEARCH_URI}&page.number=2"),
            "<searchResult><total>3</total><currentPage>2</currentPage><maxPages>2</maxPages><ads>\
             <ad><mobileAdId>33</mobileAdId></ad>\
             </ads></searchResult>",
        )
        .respond(
            "https://services.mobile.de/search-api/ad/11",
            "<ad><mobileAdId>11</mobileAdId><airbag>true</airbag><color>red</color></ad>",
        )
        .respond(
            "https://services.mobile.de/search-api/ad/22",
            "<ad><mobileAdId>22</mobileAdId><color>blue</color>\
             <features><value>navi</value><value>ahk</value></features></ad>",
        )
        .respond(
            "https://services.mobile.de/search-api/ad/33",
            "<ad><mobileAdId>33</mobileAdId></ad>",
        )
}

fn full_config() -> ConnectorConfig {
    ConnectorConfig::new(SEARCH_URI)
        .with_basic_auth("user", "secret")
        .with_accept("application/xml")
        .with_detail()
        .with_equipment_fields("airbag,color,features")
}

fn equipment_collection(ad: &Element) -> Option<&str> {
    ad.child_text("equipmentCollection")
}

#[tokio::test]
async fn test_full_pipeline_shape() {
    let fetcher = full_feed_fetcher();
    let connector = MobileDeConnector::new(fetcher.clone(), full_config());

    let doc = connector.fetch_document().await.unwrap();

    assert_eq!(doc.total, 3);
    assert_eq!(doc.len(), 3);

    // Ad order survives pagination and enrichment
    let ids: Vec<_> = doc
        .ads
        .iter()
        .map(|ad| ad.child_text("mobileAdId").unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["11", "22", "33"]);

    // Enrichment replaced the first ad wholesale
    assert!(doc.ads[0].child("stale").is_none());

    // Boolean field keeps the bare code; selector order drives the join
    assert_eq!(equipment_collection(&doc.ads[0]), Some("airbag,color.red"));

    // Multi-valued field expands, selector order first
    assert_eq!(
        equipment_collection(&doc.ads[1]),
        Some("color.blue,features.navi,features.ahk")
    );

    // No matches at all still yields the empty containers
    assert_eq!(equipment_collection(&doc.ads[2]), Some(""));
    assert!(doc.ads[2].child("equipments").unwrap().children.is_empty());

    // The matched source nodes are gone
    assert!(doc.ads[1].child("color").is_none());
    assert!(doc.ads[1].child("features").is_none());
}

#[tokio::test]
async fn test_fetch_order_pages_then_details() {
    let fetcher = full_feed_fetcher();
    let connector = MobileDeConnector::new(fetcher.clone(), full_config());

    connector.fetch_document().await.unwrap();

    assert_eq!(
        fetcher.fetched_urls(),
        vec![
            format!("{SEARCH_URI}&page.number=1"),
            format!("{SEARCH_URI}&page.number=2"),
            "https://services.mobile.de/search-api/ad/11".to_string(),
            "https://services.mobile.de/search-api/ad/22".to_string(),
            "https://services.mobile.de/search-api/ad/33".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_stages_are_optional() {
    let fetcher = full_feed_fetcher();
    // Neither detail nor equipment stage configured
    let connector = MobileDeConnector::new(fetcher.clone(), ConnectorConfig::new(SEARCH_URI));

    let doc = connector.fetch_document().await.unwrap();

    // Only the two pages were fetched
    assert_eq!(fetcher.fetch_count(), 2);
    // The raw search ads pass through untouched
    assert_eq!(doc.ads[0].child_text("stale"), Some("yes"));
    assert!(doc.ads[0].child("equipments").is_none());
}

#[tokio::test]
async fn test_concurrent_enrichment_matches_sequential_output() {
    let sequential = MobileDeConnector::new(full_feed_fetcher(), full_config())
        .fetch_document()
        .await
        .unwrap();

    let concurrent = MobileDeConnector::new(
        full_feed_fetcher(),
        full_config().with_detail_concurrency(8),
    )
    .fetch_document()
    .await
    .unwrap();

    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_collapse_policy_end_to_end() {
    let connector = MobileDeConnector::new(
        full_feed_fetcher(),
        full_config().with_multi_value_policy(MultiValuePolicy::Collapse),
    );

    let doc = connector.fetch_document().await.unwrap();

    // One entry per matched node, values comma-joined, no collection
    let features = doc.ads[1]
        .child("equipments")
        .unwrap()
        .children_named("equipment")
        .find(|e| e.child_text("code") == Some("features"))
        .unwrap()
        .clone();
    assert_eq!(features.child_text("value"), Some("navi,ahk"));
    assert!(equipment_collection(&doc.ads[1]).is_none());
}

#[tokio::test]
async fn test_detail_failure_aborts_invocation() {
    let fetcher = MockFetcher::new()
        .respond(
            format!("{SEARCH_URI}&page.number=1"),
            "<searchResult><total>1</total><currentPage>1</currentPage><maxPages>1</maxPages>\
             <ads><ad><mobileAdId>11</mobileAdId></ad></ads></searchResult>",
        )
        .respond_status("https://services.mobile.de/search-api/ad/11", 500);

    let connector = MobileDeConnector::new(fetcher, full_config());
    let err = connector.fetch_document().await.unwrap_err();
    assert!(matches!(err, ConnectorError::Fetch(_)));
}

#[tokio::test]
async fn test_invalid_equipment_fields_fail() {
    let connector = MobileDeConnector::new(
        full_feed_fetcher(),
        ConnectorConfig::new(SEARCH_URI).with_equipment_fields("color,,airbag"),
    );

    let err = connector.fetch_document().await.unwrap_err();
    assert!(matches!(err, ConnectorError::Selector(_)));
}

#[tokio::test]
async fn test_stage_hooks_see_every_stage() {
    use std::sync::{Arc, Mutex};

    let stages = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&stages);

    let connector =
        MobileDeConnector::new(full_feed_fetcher(), full_config()).with_hook(move |stage, doc| {
            log.lock().unwrap().push(stage);
            doc
        });

    connector.fetch_document().await.unwrap();
    assert_eq!(
        *stages.lock().unwrap(),
        vec![Stage::Aggregate, Stage::Enrich, Stage::Transform]
    );
}

#[tokio::test]
async fn test_hooks_can_rewrite_the_document() {
    // A hook that drops every ad after the first, after aggregation
    let connector =
        MobileDeConnector::new(full_feed_fetcher(), full_config()).with_hook(|stage, mut doc| {
            if stage == Stage::Aggregate {
                doc.ads.truncate(1);
            }
            doc
        });

    let doc = connector.fetch_document().await.unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.ads[0].child_text("mobileAdId"), Some("11"));
}

#[tokio::test]
async fn test_fetch_raw_round_trips_through_the_document_model() {
    let connector = MobileDeConnector::new(full_feed_fetcher(), full_config());

    let xml = connector.fetch_raw().await.unwrap();
    let root = mobilede_connector::xml::parse_str("test://output", &xml).unwrap();
    let doc = Document::from_element(&root).unwrap();

    assert_eq!(doc.total, 3);
    assert_eq!(doc.len(), 3);
}
