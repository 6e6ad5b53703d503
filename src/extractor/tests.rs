//! Tests for extractor module

use super::*;
use crate::pagination::StopReason;
use object_store::path::Path as ObjectPath;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn extractor(sink: JsonSink) -> Extractor {
    Extractor::new(
        HttpClient::new().unwrap(),
        OffsetPaginator::new(
            PaginationConfig::new()
                .with_limit(2)
                .with_delay(Duration::ZERO),
        ),
        sink,
    )
}

async fn read_object(sink: &JsonSink, name: &str) -> Vec<Value> {
    let bytes = sink
        .destination()
        .unwrap()
        .store()
        .get(&ObjectPath::from(name))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_collection(server: &MockServer, key: &str, total: u32) {
    let mut skip = 0;
    while skip < total {
        let page: Vec<Value> = (skip..total.min(skip + 2)).map(|id| json!({"id": id})).collect();
        Mock::given(method("GET"))
            .and(path(format!("/{key}")))
            .and(query_param("skip", skip.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({key: page, "total": total})),
            )
            .mount(server)
            .await;
        skip += 2;
    }
}

// ============================================================================
// Naming Tests
// ============================================================================

#[test]
fn test_object_name() {
    assert_eq!(
        object_name("20240131_235959", "products"),
        "20240131_235959_products_full.json"
    );
    assert_eq!(object_name("nightly", "users"), "nightly_users_full.json");
}

#[test]
fn test_default_prefix_format() {
    let prefix = default_prefix();
    assert_eq!(prefix.len(), 15);
    assert_eq!(&prefix[8..9], "_");
    assert!(prefix
        .chars()
        .enumerate()
        .all(|(i, c)| if i == 8 { c == '_' } else { c.is_ascii_digit() }));
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summary_counts() {
    let mut summary = ExtractSummary::new("run");
    summary.push(SourceOutcome {
        name: "users".to_string(),
        object_name: "run_users_full.json".to_string(),
        items: 10,
        pages: 1,
        stop: Some(StopReason::TotalReached),
        saved: true,
        error: None,
    });
    summary.push(SourceOutcome::failed(
        "carts",
        "run_carts_full.json",
        "Invalid URL: relative URL without a base",
    ));

    assert_eq!(summary.total_items(), 10);
    assert_eq!(summary.saved(), 1);
    assert_eq!(summary.failed(), 1);
    assert!(summary.get("carts").unwrap().is_failed());
    assert!(!summary.get("users").unwrap().is_partial());
    assert!(summary.get("orders").is_none());
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[tokio::test]
async fn test_extract_and_save_writes_each_source() {
    let server = MockServer::start().await;
    mount_collection(&server, "products", 3).await;
    mount_collection(&server, "users", 2).await;

    let sources = vec![
        SourceConfig::new("products", format!("{}/products", server.uri())),
        SourceConfig::new("users", format!("{}/users", server.uri())),
    ];

    let extractor = extractor(JsonSink::new(Some(CloudDestination::memory())));
    let summary = extractor.extract_and_save(&sources, Some("test")).await;

    assert_eq!(summary.prefix, "test");
    assert_eq!(summary.saved(), 2);
    assert_eq!(summary.total_items(), 5);

    let products = read_object(extractor.sink(), "test_products_full.json").await;
    assert_eq!(products, vec![json!({"id": 0}), json!({"id": 1}), json!({"id": 2})]);

    let users = read_object(extractor.sink(), "test_users_full.json").await;
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_failing_source_does_not_stop_others() {
    let server = MockServer::start().await;
    mount_collection(&server, "carts", 2).await;
    mount_collection(&server, "products", 4).await;

    let sources = vec![
        SourceConfig::new("carts", format!("{}/carts", server.uri())),
        SourceConfig::new("users", "not a url"),
        SourceConfig::new("products", format!("{}/products", server.uri())),
    ];

    let extractor = extractor(JsonSink::new(Some(CloudDestination::memory())));
    let summary = extractor.extract_and_save(&sources, Some("run")).await;

    assert_eq!(summary.outcomes.len(), 3);
    assert_eq!(summary.saved(), 2);
    assert_eq!(summary.failed(), 1);

    let users = summary.get("users").unwrap();
    assert!(users.is_failed());
    assert!(!users.saved);
    assert!(users.error.as_deref().unwrap().starts_with("Invalid URL"));

    assert_eq!(read_object(extractor.sink(), "run_carts_full.json").await.len(), 2);
    assert_eq!(read_object(extractor.sink(), "run_products_full.json").await.len(), 4);

    let missing = extractor
        .sink()
        .destination()
        .unwrap()
        .store()
        .get(&ObjectPath::from("run_users_full.json"))
        .await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn test_record_path_error_fails_only_that_source() {
    let server = MockServer::start().await;
    mount_collection(&server, "users", 2).await;

    let sources = vec![
        SourceConfig::new("users", format!("{}/users", server.uri())).with_records_path("people"),
        SourceConfig::new("users_auto", format!("{}/users", server.uri())),
    ];

    let extractor = extractor(JsonSink::new(Some(CloudDestination::memory())));
    let summary = extractor.extract_and_save(&sources, Some("run")).await;

    assert!(summary.get("users").unwrap().is_failed());
    assert!(summary.get("users_auto").unwrap().saved);
}

#[tokio::test]
async fn test_partial_fetch_is_still_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{"id": 0}, {"id": 1}],
            "total": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", "2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let sources = vec![SourceConfig::new(
        "products",
        format!("{}/products", server.uri()),
    )];

    let extractor = extractor(JsonSink::new(Some(CloudDestination::memory())));
    let summary = extractor.extract_and_save(&sources, Some("run")).await;

    let outcome = summary.get("products").unwrap();
    assert!(outcome.is_partial());
    assert!(outcome.saved);
    assert_eq!(outcome.items, 2);
    assert_eq!(read_object(extractor.sink(), "run_products_full.json").await.len(), 2);
}

#[tokio::test]
async fn test_without_destination_nothing_is_saved() {
    let server = MockServer::start().await;
    mount_collection(&server, "carts", 2).await;

    let sources = vec![SourceConfig::new("carts", format!("{}/carts", server.uri()))];

    let extractor = extractor(JsonSink::disabled());
    let summary = extractor.extract_and_save(&sources, None).await;

    let outcome = summary.get("carts").unwrap();
    assert_eq!(outcome.items, 2);
    assert!(!outcome.saved);
    assert!(!outcome.is_failed());
    assert_eq!(summary.prefix.len(), 15);
    assert_eq!(
        outcome.object_name,
        format!("{}_carts_full.json", summary.prefix)
    );
}

#[tokio::test]
async fn test_from_config_memory_destination() {
    let config = crate::config::load_config_from_str(
        "destination: memory://\nsources:\n  - name: carts\n    url: https://dummyjson.com/carts\n",
    )
    .unwrap();

    let extractor = Extractor::from_config(&config).unwrap();
    assert!(extractor.sink().has_destination());
    assert_eq!(extractor.paginator().config().limit, 30);
}
