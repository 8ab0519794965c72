//! Integration Tests for the HTTP surface
//!
//! Exercises the full interception cycle through the Axum router: proxying,
//! caching, control messages and offline fallback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use intercache::error::{EngineError, Result};
use intercache::models::{Request as EngineRequest, Response as EngineResponse};
use intercache::net::Fetcher;
use intercache::{api::create_router, spawn_control_task, AppState, Config};

// == Helper Types ==

/// Fetcher answering from a fixed URL table, counting upstream calls.
#[derive(Default)]
struct ScriptedFetcher {
    replies: Mutex<HashMap<String, EngineResponse>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    fn respond(&self, url: &str, response: EngineResponse) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    fn unplug(&self, url: &str) {
        self.replies.lock().unwrap().remove(url);
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &EngineRequest) -> Result<EngineResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .get(request.url.as_str())
            .cloned()
            .ok_or_else(|| EngineError::Network(format!("unreachable: {}", request.url)))
    }
}

// == Helper Functions ==

fn test_config() -> Config {
    Config {
        app_origin: Url::parse("https://app.example.com").unwrap(),
        api_hosts: vec!["api.example.com".to_string()],
        ..Config::default()
    }
}

fn build_app() -> (Router, AppState, Arc<ScriptedFetcher>) {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let (state, rx) = AppState::new(fetcher.clone(), test_config());
    spawn_control_task(state.controller(), rx);
    (create_router(state.clone()), state, fetcher)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

// == Health & Stats ==

#[tokio::test]
async fn test_health_reports_lifecycle_state() {
    let (app, state, _) = build_app();
    state.lifecycle.activate().await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/_cache/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["lifecycle"], "active");
}

#[tokio::test]
async fn test_stats_reflect_proxy_traffic() {
    let (app, _, fetcher) = build_app();
    fetcher.respond(
        "https://app.example.com/poster.jpg",
        EngineResponse::ok(b"jpeg".to_vec()),
    );

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/poster.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/_cache/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
}

// == Interception ==

#[tokio::test]
async fn test_image_cached_after_first_fetch() {
    let (app, _, fetcher) = build_app();
    fetcher.respond(
        "https://app.example.com/poster.jpg",
        EngineResponse::ok(b"jpeg-bytes".to_vec()),
    );

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/poster.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_to_bytes(first.into_body()).await, b"jpeg-bytes");
    assert_eq!(fetcher.call_count(), 1);

    // Upstream goes away; the cached copy still serves
    fetcher.unplug("https://app.example.com/poster.jpg");

    let second = app
        .oneshot(
            Request::builder()
                .uri("/poster.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_to_bytes(second.into_body()).await, b"jpeg-bytes");
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_unreachable_upstream_without_cache_is_bad_gateway() {
    let (app, _, _) = build_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/poster.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_offline_navigation_serves_installed_shell() {
    let (app, state, fetcher) = build_app();
    fetcher.respond(
        "https://app.example.com/",
        EngineResponse::ok(b"<html>shell</html>".to_vec()),
    );
    fetcher.respond(
        "https://app.example.com/manifest.json",
        EngineResponse::ok(b"{}".to_vec()),
    );
    state.lifecycle.install().await.unwrap();

    // Navigation to a page the upstream can no longer serve
    let response = app
        .oneshot(
            Request::builder()
                .uri("/watch/42")
                .header("Sec-Fetch-Mode", "navigate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_bytes(response.into_body()).await, b"<html>shell</html>");
}

// == Remote Control ==

#[tokio::test]
async fn test_purge_all_forces_cold_cache() {
    let (app, _, fetcher) = build_app();
    fetcher.respond(
        "https://app.example.com/poster.jpg",
        EngineResponse::ok(b"jpeg".to_vec()),
    );

    // Warm the cache
    app.clone()
        .oneshot(
            Request::builder()
                .uri("/poster.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(fetcher.call_count(), 1);

    // Fire-and-forget purge
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/_cache/control")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"type":"purge-all"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // Let the listener drain the channel
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The next read is a cold miss and refetches
    app.oneshot(
        Request::builder()
            .uri("/poster.jpg")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn test_activate_now_over_http() {
    let (app, state, _) = build_app();
    assert_ne!(
        state.lifecycle.state().await,
        intercache::LifecycleState::Active
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/_cache/control")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"type":"activate-now"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        state.lifecycle.state().await,
        intercache::LifecycleState::Active
    );
}
