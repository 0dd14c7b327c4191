//! Brand context stays with its own request under concurrency.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use http::{Request, StatusCode};
use katalog_brand::UnknownBrandPolicy;
use katalog_record::{HoldingEntry, StaticHoldings, router};
use serde_json::Value;
use tower::ServiceExt;

use crate::common::{SlowHoldings, resolver, service};

async fn get(app: axum::Router, uri: &str) -> Value {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_concurrent_detail_requests_keep_their_brand() {
    let holdings = SlowHoldings {
        inner: StaticHoldings::new().with_items("plain", vec![HoldingEntry::at("Main")]),
        delay: Duration::from_millis(25),
    };
    let app = router(
        service(Arc::new(holdings)),
        resolver(),
        UnknownBrandPolicy::Reject,
    );

    let (neos, partner) = tokio::join!(
        get(app.clone(), "/catalog/plain?lib=neos"),
        get(app.clone(), "/catalog/plain?lib=partnerlib"),
    );

    assert_eq!(neos["brand"]["name"], "NEOS Library Consortium");
    assert_eq!(neos["brand"]["home_url"], "https://www.neoslibraries.ca");
    assert_eq!(partner["brand"]["name"], "Partner Library");
    assert_eq!(partner["brand"]["home_url"], "https://partner.example.org");
}

#[tokio::test]
async fn test_many_interleaved_requests() {
    let holdings = SlowHoldings {
        inner: StaticHoldings::new(),
        delay: Duration::from_millis(5),
    };
    let app = router(
        service(Arc::new(holdings)),
        resolver(),
        UnknownBrandPolicy::Reject,
    );

    let mut tasks = Vec::new();
    for i in 0..20 {
        let brand = if i % 2 == 0 { "neos" } else { "partnerlib" };
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let body = get(app, &format!("/catalog/plain?lib={brand}")).await;
            (brand, body["brand"]["brand_id"].as_str().unwrap().to_string())
        }));
    }

    for task in tasks {
        let (requested, observed) = task.await.unwrap();
        assert_eq!(requested, observed);
    }
}
