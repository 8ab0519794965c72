//! Insertion Tracker Module
//!
//! Tracks write order per namespace for oldest-inserted-first eviction.

use std::collections::VecDeque;

// == Insertion Tracker ==
/// Tracks insertion order for FIFO eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = most recently written
/// - Back = oldest write
///
/// Overwriting a key refreshes its position, so the surviving entries after
/// any trim are always the most recently written ones.
#[derive(Debug, Default)]
pub struct InsertionTracker {
    /// Keys ordered by last write
    order: VecDeque<String>,
}

impl InsertionTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Write ==
    /// Records a write for `key`, moving it to the front.
    pub fn record_write(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the oldest-written key, or None if empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    /// Returns the oldest-written key without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.back()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
