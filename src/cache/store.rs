//! Lookup Cache Module
//!
//! Time-bounded key/value memo with lazy, read-triggered expiration.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, DEFAULT_TTL};

// == Lookup Cache ==
/// Key/value memo whose entries stop being served once they reach the TTL.
///
/// There is no capacity bound and no background sweeper: a stale entry is
/// removed by the `get` that notices it.
#[derive(Debug)]
pub struct LookupCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Read statistics
    stats: CacheStats,
    /// TTL shared by every key
    ttl: Duration,
}

impl<T: Clone> LookupCache<T> {
    // == Constructor ==
    /// Creates an empty cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    // == Get ==
    /// Returns the value stored under `key` if it is younger than the TTL.
    ///
    /// A stale entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let stale = match self.entries.get(key) {
            Some(entry) if entry.is_stale(self.ttl) => true,
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            None => false,
        };

        if stale {
            self.entries.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_expiration();
        } else {
            self.stats.record_miss();
        }
        None
    }

    // == Set ==
    /// Stores or overwrites `key`, stamping it with the current time.
    pub fn set(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Length ==
    /// Returns the number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for LookupCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
