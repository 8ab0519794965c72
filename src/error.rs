//! Error types for the interception engine
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Engine Error Enum ==
/// Unified error type for the interception and caching engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Requested key absent from its namespace
    #[error("Cache miss: {0}")]
    Miss(String),

    /// Upstream fetch failed (connection error, DNS, protocol)
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream fetch exceeded its deadline
    #[error("Upstream timeout after {0}ms")]
    Timeout(u64),

    /// Upstream answered with a status the strategy does not accept
    #[error("Upstream returned status {0}")]
    BadStatus(u16),

    /// Malformed or unsupported inbound request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Underlying store rejected a read or write
    #[error("Store failure: {0}")]
    Store(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // A miss only surfaces once the network has also failed,
            // so from the caller's side it is a gateway error.
            EngineError::Miss(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            EngineError::Network(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            EngineError::Timeout(ms) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("upstream timeout after {}ms", ms),
            ),
            EngineError::BadStatus(code) => (
                StatusCode::BAD_GATEWAY,
                format!("upstream returned status {}", code),
            ),
            EngineError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            EngineError::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
