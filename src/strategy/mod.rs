//! Strategy Module
//!
//! Classifies every intercepted request and routes it to one of five
//! caching strategies.

mod classify;
mod engine;

pub use classify::{classify, RouteClass};
pub use engine::CacheEngine;
