//! Cache Store Module
//!
//! The persistent per-origin store abstraction: namespace buckets created
//! lazily on first write, overwrite-in-place per key, trim-to-ceiling on
//! write. Reads never remove expired entries — strategies deliberately fall
//! back to stale copies when the network is unavailable.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::{CacheEntry, InsertionTracker, Namespace, MAX_BODY_SIZE, MAX_KEY_LENGTH};
use crate::error::{EngineError, Result};
use crate::models::Response;

// == Cache Stats ==
/// Store-level performance counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of reads that found an entry
    pub hits: u64,
    /// Number of reads that found nothing
    pub misses: u64,
    /// Number of entries removed by ceiling trims
    pub evictions: u64,
    /// Current number of entries across all namespaces
    pub total_entries: usize,
}

// == Namespace Bucket ==
/// One versioned partition: its entries plus their write order.
#[derive(Debug, Default)]
struct Bucket {
    entries: HashMap<String, CacheEntry>,
    order: InsertionTracker,
}

// == Cache Store ==
/// Key-value store partitioned into versioned namespaces.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Buckets keyed by full versioned namespace name
    buckets: HashMap<String, Bucket>,
    /// Performance counters
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Put ==
    /// Writes a response under `key` in the given namespace, stamping it
    /// with `now_ms` and trimming the namespace to its item ceiling.
    ///
    /// The bucket is created lazily on first write. An existing key is
    /// overwritten in place and its insertion position refreshed, so the
    /// later timestamp always wins and survivors after a trim are the most
    /// recently written entries.
    pub fn put(
        &mut self,
        namespace: &Namespace,
        key: &str,
        response: Response,
        now_ms: u64,
    ) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(EngineError::Store(format!(
                "key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if response.body.len() > MAX_BODY_SIZE {
            return Err(EngineError::Store(format!(
                "body exceeds maximum size of {} bytes",
                MAX_BODY_SIZE
            )));
        }

        let bucket = self.buckets.entry(namespace.name.clone()).or_default();
        bucket
            .entries
            .insert(key.to_string(), CacheEntry::wrap(response, now_ms));
        bucket.order.record_write(key);

        // Trim to the ceiling, oldest writes first
        if let Some(max_items) = namespace.max_items {
            while bucket.entries.len() > max_items {
                match bucket.order.evict_oldest() {
                    Some(evicted) => {
                        bucket.entries.remove(&evicted);
                        self.stats.evictions += 1;
                    }
                    None => break,
                }
            }
        }

        self.stats.total_entries = self.count_entries();
        Ok(())
    }

    // == Get ==
    /// Looks up `key` in the named namespace.
    ///
    /// Expired entries are returned as-is; deciding whether a stale copy is
    /// acceptable belongs to the strategy, not the store.
    pub fn get(&mut self, namespace_name: &str, key: &str) -> Option<CacheEntry> {
        let found = self
            .buckets
            .get(namespace_name)
            .and_then(|bucket| bucket.entries.get(key))
            .cloned();

        match found {
            Some(entry) => {
                self.stats.hits += 1;
                Some(entry)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    // == Namespace Enumeration ==
    /// Names of all namespaces that currently exist.
    pub fn namespace_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of entries in the named namespace (0 if it does not exist).
    pub fn namespace_len(&self, namespace_name: &str) -> usize {
        self.buckets
            .get(namespace_name)
            .map(|b| b.entries.len())
            .unwrap_or(0)
    }

    // == Delete Namespace ==
    /// Deletes one namespace wholesale. Returns true if it existed.
    pub fn delete_namespace(&mut self, namespace_name: &str) -> bool {
        let existed = self.buckets.remove(namespace_name).is_some();
        self.stats.total_entries = self.count_entries();
        existed
    }

    // == Purge All ==
    /// Deletes every namespace regardless of version. Subsequent reads
    /// behave as if no namespace had ever existed.
    pub fn purge_all(&mut self) -> usize {
        let purged = self.buckets.len();
        self.buckets.clear();
        self.stats.total_entries = 0;
        purged
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    fn count_entries(&self) -> usize {
        self.buckets.values().map(|b| b.entries.len()).sum()
    }
}
