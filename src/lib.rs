//! Intercache - a request-interception and response-caching engine
//!
//! Sits between the application and the network, classifies every outbound
//! request, applies one of five caching strategies and serves responses from
//! versioned local namespaces when appropriate.

pub mod api;
pub mod cache;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod net;
pub mod strategy;

pub use api::AppState;
pub use config::Config;
pub use control::{spawn_control_task, Controller};
pub use lifecycle::{LifecycleManager, LifecycleState};
pub use strategy::CacheEngine;
