//! API Module
//!
//! HTTP surface of the engine: a catch-all interception handler that proxies
//! application traffic through the strategy dispatcher, plus a small
//! reserved prefix for out-of-band control.
//!
//! # Endpoints
//! - `POST /_cache/control` - Remote control messages (fire-and-forget)
//! - `GET /_cache/health` - Health and lifecycle state
//! - `GET /_cache/stats` - Store statistics
//! - everything else - intercepted and served through the cache engine

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
