//! Request and Response models for the interception engine
//!
//! Defines the engine-level request/response envelope, the remote control
//! message wire format, and the DTOs used by the HTTP surface.

pub mod api;
pub mod control;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use api::{ErrorResponse, HealthResponse, StatsResponse};
pub use control::ControlMessage;
pub use request::Request;
pub use response::Response;
