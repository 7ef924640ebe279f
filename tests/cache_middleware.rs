//! End-to-end tests for the response cache, driven through the full router
//! with an in-memory cache backend.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use devmate_api::cache::{CacheBackend, CacheConfig, CacheManager, CacheMonitor, MemoryStore};
use devmate_api::api::routes::create_router;
use devmate_api::config::AuthConfig;
use devmate_api::state::AppState;
use devmate_api::utils::jwt::generate_token;

const SECRET: &str = "integration_test_secret_0123456789abcdef";

fn test_state() -> AppState {
    let config = CacheConfig {
        enabled: true,
        backend: CacheBackend::Memory,
        ..Default::default()
    };
    let backend = Arc::new(MemoryStore::new(&config.memory));
    let monitor = CacheMonitor::new(CacheManager::with_backend(backend, config));
    let auth = AuthConfig {
        jwt_secret: SECRET.to_string(),
        access_token_expiration: 1,
    };
    AppState::new(monitor, auth)
}

fn test_app() -> (Router, AppState) {
    let state = test_state();
    (create_router(state.clone()), state)
}

fn bearer(user_id: i64, username: &str) -> String {
    let token = generate_token(user_id, username.to_string(), SECRET, 1).unwrap();
    format!("Bearer {token}")
}

async fn get(app: &Router, uri: &str, auth: Option<&str>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes().to_vec();
    (parts.status, parts.headers, bytes)
}

async fn post_json(app: &Router, uri: &str, auth: Option<&str>, body: &str) -> StatusCode {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
        .status()
}

/// Detached invalidation tasks need a moment to run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

fn cache_marker(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers.get("x-cache").and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn repeated_get_is_miss_then_hit_with_identical_bodies() {
    let (app, _state) = test_app();

    let (status, headers, first) = get(&app, "/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_marker(&headers), Some("MISS"));
    assert!(headers.contains_key("x-cache-key"));

    let (status, headers, second) = get(&app, "/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_marker(&headers), Some("HIT"));
    assert_eq!(
        headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("private, max-age=60")
    );

    assert_eq!(first, second);
}

#[tokio::test]
async fn query_string_is_part_of_the_key() {
    let (app, _state) = test_app();

    let (_, headers, _) = get(&app, "/api/posts", None).await;
    assert_eq!(cache_marker(&headers), Some("MISS"));

    // Different query, different key: no false hit.
    let (_, headers, _) = get(&app, "/api/posts?page=2", None).await;
    assert_eq!(cache_marker(&headers), Some("MISS"));
}

#[tokio::test]
async fn principals_never_share_cache_entries() {
    let (app, _state) = test_app();
    let alice = bearer(1, "octocat");
    let bob = bearer(2, "ferris");

    let (_, headers, _) = get(&app, "/api/users/1", Some(&alice)).await;
    assert_eq!(cache_marker(&headers), Some("MISS"));
    let alice_key = headers.get("x-cache-key").cloned().unwrap();

    // Same path, different principal: independent MISS and a distinct key.
    let (_, headers, _) = get(&app, "/api/users/1", Some(&bob)).await;
    assert_eq!(cache_marker(&headers), Some("MISS"));
    assert_ne!(headers.get("x-cache-key"), Some(&alice_key));

    // Anonymous is its own principal too.
    let (_, headers, _) = get(&app, "/api/users/1", None).await;
    assert_eq!(cache_marker(&headers), Some("MISS"));
}

#[tokio::test]
async fn successful_write_purges_matching_entries() {
    let (app, _state) = test_app();
    let auth = bearer(1, "octocat");

    get(&app, "/api/posts", None).await;
    let (_, headers, _) = get(&app, "/api/posts", None).await;
    assert_eq!(cache_marker(&headers), Some("HIT"));

    let status = post_json(
        &app,
        "/api/posts",
        Some(&auth),
        r#"{"content":"fresh post","tags":["rust"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    settle().await;

    let (_, headers, _) = get(&app, "/api/posts", None).await;
    assert_eq!(cache_marker(&headers), Some("MISS"));
}

#[tokio::test]
async fn failed_write_leaves_cache_intact() {
    let (app, _state) = test_app();
    let auth = bearer(1, "octocat");

    get(&app, "/api/posts", None).await;

    // Validation failure: 400, no invalidation.
    let status = post_json(&app, "/api/posts", Some(&auth), r#"{"content":"  "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unauthenticated: 401, no invalidation.
    let status = post_json(&app, "/api/posts", None, r#"{"content":"hi"}"#).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    settle().await;

    let (_, headers, _) = get(&app, "/api/posts", None).await;
    assert_eq!(cache_marker(&headers), Some("HIT"));
}

#[tokio::test]
async fn profile_update_invalidates_user_entries() {
    let (app, _state) = test_app();
    let auth = bearer(1, "octocat");

    get(&app, "/api/users/1", None).await;
    let (_, headers, _) = get(&app, "/api/users/1", None).await;
    assert_eq!(cache_marker(&headers), Some("HIT"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/users/1")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::from(r#"{"bio":"updated bio"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    settle().await;

    let (_, headers, body) = get(&app, "/api/users/1", None).await;
    assert_eq!(cache_marker(&headers), Some("MISS"));
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["bio"], "updated bio");
}

#[tokio::test]
async fn mutating_requests_carry_no_cache_marker() {
    let (app, _state) = test_app();
    let auth = bearer(1, "octocat");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/posts/1/like")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("x-cache"));
}

#[tokio::test]
async fn monitor_counters_reflect_traffic() {
    let (app, state) = test_app();

    get(&app, "/api/posts", None).await; // miss + set
    get(&app, "/api/posts", None).await; // hit
    get(&app, "/api/posts", None).await; // hit

    let stats = state.cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.sets, 1);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.hit_rate, "66.67%");
}

#[tokio::test]
async fn health_reports_all_services() {
    let (app, _state) = test_app();

    let (status, _, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["services"]["api"], "healthy");
    assert_eq!(json["services"]["database"], "unknown");
    assert_eq!(json["services"]["redis"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn cache_stats_round_trip_and_reset() {
    let (app, _state) = test_app();

    get(&app, "/api/posts", None).await;
    get(&app, "/api/posts", None).await;

    let (status, _, body) = get(&app, "/cache-stats", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["connected"], true);
    assert_eq!(json["cache_info"]["hits"], 1);
    assert_eq!(json["cache_info"]["enabled"], true);
    assert!(json["uptime"].is_number());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache-stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_, _, body) = get(&app, "/cache-stats", None).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["cache_info"]["hits"], 0);
    assert_eq!(json["cache_info"]["hit_rate"], "0%");
}

#[tokio::test]
async fn expired_entries_are_recomputed() {
    let (_, state) = test_app();

    // Direct end-to-end TTL check against the monitor.
    assert!(state.cache.set("k", b"v".to_vec(), 1).await);
    assert_eq!(state.cache.get("k").await, Some(b"v".to_vec()));
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(state.cache.get("k").await, None);
}
