//! Detail-view pipeline: fetch, holdings, enrichment, links.

use std::sync::Arc;

use katalog_brand::DEFAULT_BRAND;
use katalog_record::{HoldingEntry, HoldingLink, StaticHoldings, UNTITLED};
use katalog_search::SearchRequest;

use crate::common::{resolver, service};

#[tokio::test]
async fn test_untitled_record_scenario() {
    let holdings = StaticHoldings::new().with_items(
        "untitled",
        vec![
            HoldingEntry::at("Annex").holdable(true),
            HoldingEntry::at("main").bookable(true),
        ],
    );
    let brand = resolver().resolve(None).unwrap();

    let view = service(Arc::new(holdings))
        .show(brand, "untitled")
        .await
        .expect("detail view should build");

    let enriched = view.enriched;
    assert_eq!(enriched.title, UNTITLED);
    let locations: Vec<_> = enriched
        .holdings
        .iter()
        .map(|h| h.location.as_deref().unwrap())
        .collect();
    assert_eq!(locations, vec!["main", "Annex"]);
    assert!(!enriched.holdable);
    assert!(enriched.bookable);
    assert_eq!(
        enriched.subjects,
        Some(vec![vec!["Fiction".to_string(), "Mystery".to_string()]])
    );
    assert_eq!(enriched.additional_authors, Some(vec!["Smith, J.".to_string()]));
    assert_eq!(enriched.fulltext_urls, None);
    assert_eq!(view.brand.brand_id, DEFAULT_BRAND);
}

#[tokio::test]
async fn test_online_record_takes_links() {
    let holdings = StaticHoldings::new()
        .with_links("online", vec![HoldingLink::new("https://proxy.example.org/online")]);
    let brand = resolver().resolve(Some("partnerlib")).unwrap();

    let view = service(Arc::new(holdings)).show(brand, "online").await.unwrap();

    assert_eq!(view.enriched.title, "Northern Lights");
    assert_eq!(
        view.enriched.fulltext_urls,
        Some(vec!["https://proxy.example.org/online".to_string()])
    );
    assert!(view.enriched.holdings.is_empty());
    assert_eq!(view.brand.name, "Partner Library");
}

#[tokio::test]
async fn test_malformed_holdings_degrade_the_page() {
    let holdings = StaticHoldings::from_json(
        r#"{"plain": [{"location": "Main", "holdable": true}, {"holdable": true}]}"#,
    )
    .unwrap();
    let brand = resolver().resolve(None).unwrap();

    let view = service(Arc::new(holdings)).show(brand, "plain").await.unwrap();

    assert!(view.enriched.holdings.is_empty());
    assert!(!view.enriched.holdable);
    assert!(view.enriched.holdings_omitted.is_some());
    assert_eq!(view.enriched.title, "Prairie Fire");
}

#[tokio::test]
async fn test_holdings_outage_is_upstream_error() {
    let holdings = StaticHoldings::new().failing_for("plain");
    let brand = resolver().resolve(None).unwrap();

    let err = service(Arc::new(holdings))
        .show(brand, "plain")
        .await
        .unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_list_flow_carries_brand_and_facets() {
    let brand = resolver().resolve(Some("partnerlib")).unwrap();
    let view = service(Arc::new(StaticHoldings::new()))
        .index(brand, &SearchRequest::default())
        .await
        .unwrap();

    assert_eq!(view.response.total, 3);
    assert_eq!(view.brand.brand_id, "partnerlib");
    let formats = view.response.facet("format").unwrap();
    assert_eq!(formats.values[0].value, "Book");
}
