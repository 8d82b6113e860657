//! Cache Module
//!
//! In-memory lookup cache with a single TTL and lazy expiration.

mod entry;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::LookupCache;

use crate::models::CountryRecord;

// == Public Constants ==
/// TTL applied to every cached lookup (one hour)
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Key prefix for name lookups (after alias normalization)
pub const NAME_KEY_PREFIX: &str = "name_";

/// Key prefix for alpha-3 code lookups
pub const CODE_KEY_PREFIX: &str = "code_";

/// Value stored by the fetch layer.
///
/// Name lookups cache the whole match list, code lookups a single record.
#[derive(Debug, Clone)]
pub enum CachedLookup {
    Matches(Vec<CountryRecord>),
    Country(CountryRecord),
}

/// Cache shared by every fetch client of a session.
pub type SharedCache = Arc<RwLock<LookupCache<CachedLookup>>>;

/// Creates an empty shared cache with the given TTL.
pub fn shared_cache(ttl: Duration) -> SharedCache {
    Arc::new(RwLock::new(LookupCache::new(ttl)))
}

/// Cache key for a normalized name lookup.
pub fn name_key(normalized: &str) -> String {
    format!("{}{}", NAME_KEY_PREFIX, normalized)
}

/// Cache key for a code lookup. The code is used verbatim.
pub fn code_key(code: &str) -> String {
    format!("{}{}", CODE_KEY_PREFIX, code)
}
