//! API Handlers
//!
//! HTTP request handlers for the control surface and the interception
//! fallback.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderName, HeaderValue, StatusCode},
    Json,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::control::{control_channel, Controller};
use crate::error::Result;
use crate::lifecycle::LifecycleManager;
use crate::models::{ControlMessage, HealthResponse, Request, StatsResponse};
use crate::net::Fetcher;
use crate::strategy::CacheEngine;

/// Headers never replayed from a stored envelope; the HTTP layer
/// recomputes them.
const SKIPPED_REPLAY_HEADERS: &[&str] = &["content-length", "transfer-encoding", "connection"];

// == App State ==
/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Strategy dispatcher and executor
    pub engine: Arc<CacheEngine>,
    /// Shared cache store (stats, control)
    pub store: Arc<RwLock<CacheStore>>,
    /// Lifecycle state machine
    pub lifecycle: Arc<LifecycleManager>,
    /// Sender half of the remote control channel
    pub control_tx: UnboundedSender<ControlMessage>,
    /// Engine configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires store, engine, lifecycle and control channel together.
    ///
    /// Returns the state plus the receiver half of the control channel,
    /// which the caller hands to [`crate::control::spawn_control_task`].
    pub fn new(fetcher: Arc<dyn Fetcher>, config: Config) -> (Self, UnboundedReceiver<ControlMessage>) {
        let config = Arc::new(config);
        let store = Arc::new(RwLock::new(CacheStore::new()));
        let engine = Arc::new(CacheEngine::new(
            Arc::clone(&store),
            Arc::clone(&fetcher),
            Arc::clone(&config),
        ));
        let lifecycle = Arc::new(LifecycleManager::new(
            Arc::clone(&store),
            fetcher,
            Arc::clone(&config),
        ));
        let (control_tx, control_rx) = control_channel();

        (
            Self {
                engine,
                store,
                lifecycle,
                control_tx,
                config,
            },
            control_rx,
        )
    }

    /// Controller for the control-channel listener.
    pub fn controller(&self) -> Arc<Controller> {
        Arc::new(Controller::new(
            Arc::clone(&self.store),
            Arc::clone(&self.lifecycle),
        ))
    }
}

/// Handler for POST /_cache/control
///
/// Fire-and-forget: the message is queued for the background listener and
/// the call returns immediately with no payload.
pub async fn control_handler(
    State(state): State<AppState>,
    Json(message): Json<ControlMessage>,
) -> StatusCode {
    if state.control_tx.send(message).is_err() {
        warn!("control listener gone, message dropped");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::ACCEPTED
}

/// Handler for GET /_cache/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let lifecycle = state.lifecycle.state().await;
    Json(HealthResponse::healthy(lifecycle.as_str()))
}

/// Handler for GET /_cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.read().await;
    let stats = store.stats();
    Json(StatsResponse::new(
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.total_entries,
        store.namespace_names(),
    ))
}

/// Fallback handler: every other request is intercepted, rebuilt against the
/// configured application origin and pushed through the strategy dispatcher.
pub async fn intercept_handler(
    State(state): State<AppState>,
    inbound: axum::extract::Request,
) -> Result<axum::response::Response> {
    let path_and_query = inbound
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let url = state
        .config
        .app_origin
        .join(path_and_query)
        .map_err(|e| crate::error::EngineError::InvalidRequest(e.to_string()))?;

    let mut request = Request::new(inbound.method().as_str(), url);
    for (name, value) in inbound.headers() {
        if let Ok(value) = value.to_str() {
            request.headers.push((name.as_str().to_string(), value.to_string()));
        }
    }

    let outcome = state.engine.handle(request).await?;

    // Rebuild the HTTP response from the stored envelope
    let mut response = axum::response::Response::new(Body::from(outcome.body));
    *response.status_mut() =
        StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let headers = response.headers_mut();
    for (name, value) in &outcome.headers {
        if SKIPPED_REPLAY_HEADERS
            .iter()
            .any(|h| name.eq_ignore_ascii_case(h))
        {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.append(name, value);
        }
    }

    Ok(response)
}
