//! API Routes
//!
//! Configures the Axum router: the reserved control surface plus the
//! catch-all interception fallback.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    control_handler, health_handler, intercept_handler, stats_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `POST /_cache/control` - Remote control messages
/// - `GET /_cache/health` - Health and lifecycle state
/// - `GET /_cache/stats` - Store statistics
/// - fallback - interception through the cache engine
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/_cache/control", post(control_handler))
        .route("/_cache/health", get(health_handler))
        .route("/_cache/stats", get(stats_handler))
        .fallback(intercept_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
