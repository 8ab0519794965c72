//! Entry Codec
//!
//! Wraps a network response with an injected capture timestamp so age can be
//! computed later without relying on upstream cache-control headers. The
//! timestamp is carried as a synthetic header (base-10 millisecond Unix
//! epoch) so it survives serialization of the envelope.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::models::Response;

/// Synthetic header carrying the capture timestamp.
pub const CAPTURED_AT_HEADER: &str = "x-intercache-captured-at";

// == Cache Entry ==
/// A single stored request→response pair with capture timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response, with the capture-timestamp header injected
    pub response: Response,
    /// Capture timestamp (Unix milliseconds)
    pub captured_at: u64,
}

impl CacheEntry {
    // == Encode ==
    /// Wraps a response captured at `now_ms`, stamping the synthetic header.
    pub fn wrap(mut response: Response, now_ms: u64) -> Self {
        response.set_header(CAPTURED_AT_HEADER, now_ms.to_string());
        Self {
            response,
            captured_at: now_ms,
        }
    }

    // == Decode ==
    /// Rebuilds an entry from a previously stored envelope, reading the
    /// capture timestamp back out of the synthetic header. A missing or
    /// unparseable header yields timestamp 0, i.e. maximally stale.
    pub fn unwrap_envelope(response: Response) -> Self {
        let captured_at = response
            .header(CAPTURED_AT_HEADER)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        Self {
            response,
            captured_at,
        }
    }

    // == Age ==
    /// Age of the entry at `now_ms`. Clamps to zero if the clock ran backwards.
    pub fn age_at(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.captured_at))
    }

    // == Is Expired ==
    /// Whether the entry is stale at `now_ms` under the given max-age.
    ///
    /// Boundary condition: an entry captured at T with max-age M is expired
    /// for every query at time >= T + M, and fresh strictly before that. A
    /// namespace without a max-age never expires entries.
    pub fn is_expired_at(&self, now_ms: u64, max_age: Option<Duration>) -> bool {
        match max_age {
            Some(max_age) => self.age_at(now_ms) >= max_age,
            None => false,
        }
    }

    /// Whether the entry is stale right now under the given max-age.
    pub fn is_expired(&self, max_age: Option<Duration>) -> bool {
        self.is_expired_at(current_timestamp_ms(), max_age)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
