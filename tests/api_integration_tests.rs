//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles through the router, including cache
//! hits, expiry, invalidation and owner isolation.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use wellsync_cache::{
    api::create_router,
    cache::{ManualClock, ResponseCache},
    AppState,
};

// == Helper Functions ==

const T: u64 = 1_700_000_000_000;

struct TestApp {
    app: Router,
    clock: Arc<ManualClock>,
    cache: Arc<ResponseCache>,
}

fn create_test_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(T));
    let cache = Arc::new(ResponseCache::with_clock(clock.clone()));
    let app = create_router(AppState::new(cache.clone()));
    TestApp { app, clock, cache }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn create_prediction(
    app: &Router,
    user: &str,
    kind: &str,
    body: &str,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/predictions/{}", kind))
                .header("content-type", "application/json")
                .header("x-user-id", user)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn send(app: &Router, method: &str, uri: &str, user: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

fn strip_diagnostics(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        map.remove("cached");
        map.remove("cacheAge");
    }
    body
}

const STRESS: &str = r#"{"input":{"sleepHours":6},"scores":{"stressLevel":2}}"#;

// == Cache Hit Tests ==

#[tokio::test]
async fn test_second_read_served_from_cache() {
    let t = create_test_app();
    create_prediction(&t.app, "u1", "stress", STRESS).await;

    let (status, fresh) = get(&t.app, "/api/predictions", Some("u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fresh.get("cached").is_none(), "fresh response is unmodified");
    assert_eq!(fresh["count"], 1);

    t.clock.advance(Duration::from_secs(60));
    let (status, cached) = get(&t.app, "/api/predictions", Some("u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached["cached"], true);
    assert_eq!(cached["cacheAge"], 60_000);
    assert_eq!(strip_diagnostics(cached), fresh);
}

#[tokio::test]
async fn test_cached_read_does_not_see_unrelated_writes() {
    let t = create_test_app();
    get(&t.app, "/api/users/dashboard", Some("u1")).await;

    // A different caller's write leaves u1's cached dashboard alone
    create_prediction(&t.app, "u2", "stress", STRESS).await;

    let (_, body) = get(&t.app, "/api/users/dashboard", Some("u1")).await;
    assert_eq!(body["cached"], true);
    assert_eq!(body["data"]["totalPredictions"], 0);
}

// == Expiry Tests ==

#[tokio::test]
async fn test_short_route_recomputes_after_five_minutes() {
    let t = create_test_app();
    get(&t.app, "/api/predictions", Some("u1")).await;

    t.clock.advance(Duration::from_secs(6 * 60));
    let (status, body) = get(&t.app, "/api/predictions", Some("u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("cached").is_none(), "stale entry must not be served");

    let stats = t.cache.stats().await;
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.entries[0].key, "u1:/api/predictions");
    assert_eq!(stats.entries[0].age, 0, "a new entry replaced the stale one");
}

#[tokio::test]
async fn test_medium_route_still_fresh_after_ten_minutes() {
    let t = create_test_app();
    get(&t.app, "/api/users/dashboard", Some("u1")).await;

    t.clock.advance(Duration::from_secs(10 * 60));
    let (_, body) = get(&t.app, "/api/users/dashboard", Some("u1")).await;
    assert_eq!(body["cached"], true);

    t.clock.advance(Duration::from_secs(5 * 60));
    let (_, body) = get(&t.app, "/api/users/dashboard", Some("u1")).await;
    assert!(body.get("cached").is_none());
}

// == Invalidation Tests ==

#[tokio::test]
async fn test_create_invalidates_callers_reads() {
    let t = create_test_app();
    get(&t.app, "/api/predictions", Some("u1")).await;
    get(&t.app, "/api/users/dashboard", Some("u1")).await;
    get(&t.app, "/api/predictions", Some("u2")).await;

    let (status, created) = create_prediction(&t.app, "u1", "stress", STRESS).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["type"], "stress");

    let (_, list) = get(&t.app, "/api/predictions", Some("u1")).await;
    assert!(list.get("cached").is_none());
    assert_eq!(list["count"], 1);

    let (_, other) = get(&t.app, "/api/predictions", Some("u2")).await;
    assert_eq!(other["cached"], true);
}

#[tokio::test]
async fn test_delete_invalidates_callers_reads() {
    let t = create_test_app();
    let (_, created) = create_prediction(&t.app, "u1", "stress", STRESS).await;
    let id = created["data"]["id"].as_u64().unwrap();
    let uri = format!("/api/predictions/{}", id);

    let (status, _) = get(&t.app, &uri, Some("u1")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(send(&t.app, "DELETE", &uri, Some("u1")).await, StatusCode::OK);

    let (status, _) = get(&t.app, &uri, Some("u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_clear_all_and_by_pattern() {
    let t = create_test_app();
    get(&t.app, "/api/predictions", Some("u1")).await;
    get(&t.app, "/api/predictions", Some("u2")).await;
    get(&t.app, "/api/users/dashboard", Some("u2")).await;

    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/cache?pattern=u2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cleared"], 2);
    assert_eq!(json["pattern"], "u2");

    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cleared"], 1);

    let (_, stats) = get(&t.app, "/api/admin/cache/stats", None).await;
    assert_eq!(stats["totalEntries"], 0);
    assert_eq!(stats["totalSize"], 0);
}

#[tokio::test]
async fn test_stats_report_hit_rate() {
    let t = create_test_app();
    get(&t.app, "/api/models", None).await;
    get(&t.app, "/api/models", None).await;

    let (status, stats) = get(&t.app, "/api/admin/cache/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["hitRate"], 0.5);
    assert_eq!(stats["entries"][0]["key"], "anonymous:/api/models");
    assert_eq!(stats["totalSize"], stats["entries"][0]["size"]);
}

// == Key Derivation Tests ==

#[tokio::test]
async fn test_owners_get_independent_entries() {
    let t = create_test_app();
    create_prediction(&t.app, "u1", "stress", STRESS).await;

    let (_, first) = get(&t.app, "/api/predictions", Some("u1")).await;
    let (_, second) = get(&t.app, "/api/predictions", Some("u2")).await;
    assert_eq!(first["count"], 1);
    assert_eq!(second["count"], 0);
    assert!(second.get("cached").is_none(), "no cross-owner leakage");

    let stats = t.cache.stats().await;
    assert_eq!(stats.total_entries, 2);
}

#[tokio::test]
async fn test_query_string_is_part_of_key() {
    let t = create_test_app();
    create_prediction(&t.app, "u1", "stress", STRESS).await;

    let (_, all) = get(&t.app, "/api/predictions", Some("u1")).await;
    let (_, filtered) = get(&t.app, "/api/predictions?type=mental-wellness", Some("u1")).await;
    assert_eq!(all["count"], 1);
    assert_eq!(filtered["count"], 0);
    assert!(filtered.get("cached").is_none());

    let stats = t.cache.stats().await;
    let mut keys: Vec<String> = stats.entries.into_iter().map(|e| e.key).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "u1:/api/predictions".to_string(),
            "u1:/api/predictions?type=mental-wellness".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_anonymous_callers_share_entry() {
    let t = create_test_app();

    let (status, first) = get(&t.app, "/api/models", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(first.get("cached").is_none());

    let (_, second) = get(&t.app, "/api/models", None).await;
    assert_eq!(second["cached"], true);

    let stats = t.cache.stats().await;
    assert_eq!(stats.entries[0].key, "anonymous:/api/models");
}

#[tokio::test]
async fn test_reserved_anonymous_id_is_treated_as_unauthenticated() {
    let t = create_test_app();

    let (status, _) = create_prediction(&t.app, "anonymous", "stress", STRESS).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&t.app, "/api/predictions", Some("anonymous")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get(&t.app, "/api/predictions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("data").is_none());

    assert!(t.cache.is_empty().await);
}

// == Create Route Tests ==

#[tokio::test]
async fn test_kind_comes_from_path() {
    let t = create_test_app();

    let (status, created) =
        create_prediction(&t.app, "u1", "academic-impact", r#"{"input":{"gpa":3.2}}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["type"], "academic-impact");

    let (_, filtered) = get(&t.app, "/api/predictions?type=academic-impact", Some("u1")).await;
    assert_eq!(filtered["count"], 1);
}

#[tokio::test]
async fn test_unknown_kind_is_rejected() {
    let t = create_test_app();

    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predictions/horoscope")
                .header("content-type", "application/json")
                .header("x-user-id", "u1")
                .body(Body::from(STRESS))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, list) = get(&t.app, "/api/predictions", Some("u1")).await;
    assert_eq!(list["count"], 0);
}

// == Bypass Tests ==

#[tokio::test]
async fn test_errors_are_not_cached() {
    let t = create_test_app();

    let (status, body) = get(&t.app, "/api/predictions/999", Some("u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());

    let (status, _) = get(&t.app, "/api/predictions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(t.cache.is_empty().await);
}

#[tokio::test]
async fn test_writes_bypass_cache() {
    let t = create_test_app();

    let (first_status, first) = create_prediction(&t.app, "u1", "stress", STRESS).await;
    let (second_status, second) = create_prediction(&t.app, "u1", "stress", STRESS).await;
    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::CREATED);
    assert_ne!(first["data"]["id"], second["data"]["id"]);
    assert!(second.get("cached").is_none());

    assert!(t.cache.is_empty().await);
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let t = create_test_app();
    let (status, _) = create_prediction_status(&t.app, r#"{"invalid json"#).await;

    // Axum returns 400 or 422 for JSON parsing errors
    assert!(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_input_must_be_object() {
    let t = create_test_app();
    let (status, body) = create_prediction(&t.app, "u1", "stress", r#"{"input":5}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

async fn create_prediction_status(app: &Router, body: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predictions/stress")
                .header("content-type", "application/json")
                .header("x-user-id", "u1")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let t = create_test_app();

    let (status, json) = get(&t.app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
