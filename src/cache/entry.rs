//! Cache Entry Module
//!
//! Defines the structure for individual lookup cache entries.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A cached value stamped with the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// When the value was stored
    pub stored_at: Instant,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is stale, so a
    /// value is only served while `age < ttl`.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    // == Time To Live ==
    /// Returns how long the entry remains servable under `ttl`.
    ///
    /// Returns `Duration::ZERO` once the entry is stale.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
