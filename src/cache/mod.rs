//! Cache Module
//!
//! Versioned cache namespaces with capture-timestamped entries,
//! oldest-inserted-first eviction and max-age expiry.

mod entry;
mod fifo;
mod namespace;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, CAPTURED_AT_HEADER};
pub use fifo::InsertionTracker;
pub use namespace::{Namespace, NamespacePrefix, NamespaceRegistry};
pub use store::{CacheStats, CacheStore};

// == Public Constants ==
/// Maximum allowed cache key length in bytes (method + absolute URL)
pub const MAX_KEY_LENGTH: usize = 2048;

/// Maximum allowed stored body size in bytes
pub const MAX_BODY_SIZE: usize = 8 * 1024 * 1024; // 8 MB
