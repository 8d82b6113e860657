//! Fetch Client
//!
//! Cache-aware lookups over a [`CountrySource`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{code_key, name_key, CacheStats, CachedLookup, SharedCache};
use crate::error::{ExplorerError, Result};
use crate::fetch::normalize_name;
use crate::models::{Comparison, CountryDetails, CountryRecord};
use crate::source::CountrySource;

// == Fetch Client ==
/// Looks countries up by name, by code and by code batch.
///
/// Every lookup consults the shared cache first. The cache lock is only held
/// between suspension points, never across a request to the source, so
/// concurrent lookups may race and the last write wins.
#[derive(Clone)]
pub struct FetchClient {
    source: Arc<dyn CountrySource>,
    cache: SharedCache,
}

impl FetchClient {
    // == Constructor ==
    pub fn new(source: Arc<dyn CountrySource>, cache: SharedCache) -> Self {
        Self { source, cache }
    }

    /// The cache this client reads and populates.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Search By Name ==
    /// Countries matching `raw_name`, after alias normalization.
    ///
    /// Never fails: a non-success answer or transport failure is logged and
    /// yields an empty list, which is not cached.
    pub async fn search_by_name(&self, raw_name: &str) -> Vec<CountryRecord> {
        let normalized = normalize_name(raw_name);
        let key = name_key(&normalized);

        if let Some(CachedLookup::Matches(records)) = self.cached(&key).await {
            debug!(query = %normalized, "name lookup served from cache");
            return records;
        }

        match self.source.by_name(&normalized).await {
            Ok(records) => {
                debug!(query = %normalized, matches = records.len(), "name lookup fetched");
                self.store(key, CachedLookup::Matches(records.clone())).await;
                records
            }
            Err(err) => {
                warn!(query = %normalized, error = %err, "name lookup failed");
                Vec::new()
            }
        }
    }

    // == Fetch By Code ==
    /// The country for `code`, used verbatim as the cache key.
    ///
    /// A non-success answer or an empty payload is `ExplorerError::NotFound`;
    /// transport failures are returned as they are.
    pub async fn fetch_by_code(&self, code: &str) -> Result<CountryRecord> {
        let key = code_key(code);

        if let Some(CachedLookup::Country(record)) = self.cached(&key).await {
            debug!(code, "code lookup served from cache");
            return Ok(record);
        }

        let records = match self.source.by_code(code).await {
            Ok(records) => records,
            Err(ExplorerError::Status(status)) => {
                debug!(code, status, "code lookup rejected");
                return Err(ExplorerError::NotFound(code.to_string()));
            }
            Err(err) => return Err(err),
        };

        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| ExplorerError::NotFound(code.to_string()))?;
        self.store(key, CachedLookup::Country(record.clone())).await;
        Ok(record)
    }

    // == Fetch By Codes ==
    /// The countries for `codes`, in input order, omitting unresolvable ones.
    ///
    /// Codes missing from the cache are fetched together in one batch
    /// request. A failed batch is logged and its codes are left out.
    pub async fn fetch_by_codes(&self, codes: &[String]) -> Vec<CountryRecord> {
        if codes.is_empty() {
            return Vec::new();
        }

        // Each code is read from the cache once, so stats see one hit or miss per code
        let mut found: HashMap<String, CountryRecord> = HashMap::new();
        let mut uncached: Vec<String> = Vec::new();
        {
            let mut cache = self.cache.write().await;
            for code in codes {
                if found.contains_key(code) || uncached.contains(code) {
                    continue;
                }
                match cache.get(&code_key(code)) {
                    Some(CachedLookup::Country(record)) => {
                        found.insert(code.clone(), record);
                    }
                    _ => uncached.push(code.clone()),
                }
            }
        }

        if !uncached.is_empty() {
            match self.source.by_codes(&uncached).await {
                Ok(records) => {
                    debug!(requested = uncached.len(), resolved = records.len(), "batch lookup fetched");
                    let mut cache = self.cache.write().await;
                    for record in records {
                        // Also file the record under a differently-cased request
                        for requested in uncached
                            .iter()
                            .filter(|c| **c != record.cca3 && c.eq_ignore_ascii_case(&record.cca3))
                        {
                            cache.set(code_key(requested), CachedLookup::Country(record.clone()));
                            found.insert(requested.clone(), record.clone());
                        }
                        cache.set(code_key(&record.cca3), CachedLookup::Country(record.clone()));
                        found.insert(record.cca3.clone(), record);
                    }
                }
                Err(err) => {
                    warn!(codes = %uncached.join(","), error = %err, "batch lookup failed");
                }
            }
        }

        codes
            .iter()
            .filter_map(|code| found.get(code).cloned())
            .collect()
    }

    // == Load Country ==
    /// A country with its neighbors resolved through one batch lookup.
    pub async fn load_country(&self, code: &str) -> Result<CountryDetails> {
        let country = self.fetch_by_code(code).await?;
        let neighbors = self.fetch_by_codes(&country.borders).await;
        Ok(CountryDetails::new(country, &neighbors))
    }

    // == Compare ==
    /// Fetches two countries and compares them.
    pub async fn compare(&self, first: &str, second: &str) -> Result<Comparison> {
        let (first, second) =
            tokio::try_join!(self.fetch_by_code(first), self.fetch_by_code(second))?;
        Ok(Comparison::between(&first, &second))
    }

    // == Stats ==
    /// Current cache statistics and the TTL in force.
    pub async fn cache_stats(&self) -> (CacheStats, Duration) {
        let cache = self.cache.read().await;
        (cache.stats(), cache.ttl())
    }

    async fn cached(&self, key: &str) -> Option<CachedLookup> {
        self.cache.write().await.get(key)
    }

    async fn store(&self, key: String, value: CachedLookup) {
        self.cache.write().await.set(key, value);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{shared_cache, DEFAULT_TTL};
    use crate::models::country::fixtures::country;
    use crate::source::{InMemorySource, SourceCall};

    fn records() -> Vec<CountryRecord> {
        let mut usa = country("USA", "United States", 331_000_000, 9_372_610.0);
        usa.name.official = "United States of America".to_string();
        usa.borders = vec!["CAN".to_string(), "MEX".to_string()];
        vec![
            country("AAA", "Aland", 1_000, 10.0),
            country("BBB", "Bland", 2_000, 20.0),
            country("CAN", "Canada", 38_000_000, 9_984_670.0),
            country("MEX", "Mexico", 128_000_000, 1_964_375.0),
            usa,
        ]
    }

    /// Answers every lookup successfully with nothing in it.
    struct EmptySource;

    #[async_trait::async_trait]
    impl CountrySource for EmptySource {
        async fn by_name(&self, _name: &str) -> Result<Vec<CountryRecord>> {
            Ok(Vec::new())
        }

        async fn by_code(&self, _code: &str) -> Result<Vec<CountryRecord>> {
            Ok(Vec::new())
        }

        async fn by_codes(&self, _codes: &[String]) -> Result<Vec<CountryRecord>> {
            Ok(Vec::new())
        }
    }

    fn setup() -> (Arc<InMemorySource>, FetchClient) {
        let source = Arc::new(InMemorySource::recording(records()));
        let client = FetchClient::new(source.clone(), shared_cache(DEFAULT_TTL));
        (source, client)
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_search_alias_shares_cache_slot() {
        let (source, client) = setup();

        let by_alias = client.search_by_name("usa").await;
        let by_name = client.search_by_name("United States").await;

        assert_eq!(by_alias.len(), 1);
        assert_eq!(by_alias, by_name);
        assert_eq!(source.calls(), vec![SourceCall::Name("United States".to_string())]);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty_and_not_cached() {
        let (source, client) = setup();

        assert!(client.search_by_name("atlantis").await.is_empty());
        assert!(client.search_by_name("atlantis").await.is_empty());
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_search_transport_failure_is_empty() {
        let (source, client) = setup();
        source.fail_names(true);

        assert!(client.search_by_name("canada").await.is_empty());

        source.fail_names(false);
        assert_eq!(client.search_by_name("canada").await.len(), 1);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_by_code_second_call_is_cache_hit() {
        let (source, client) = setup();

        let first = client.fetch_by_code("CAN").await.unwrap();
        let second = client.fetch_by_code("CAN").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_by_code_not_found() {
        let (_, client) = setup();

        let result = client.fetch_by_code("ZZZ").await;
        assert!(matches!(result, Err(ExplorerError::NotFound(code)) if code == "ZZZ"));
    }

    #[tokio::test]
    async fn test_fetch_by_code_empty_payload_is_not_found() {
        let client = FetchClient::new(Arc::new(EmptySource), shared_cache(DEFAULT_TTL));

        let result = client.fetch_by_code("CAN").await;

        assert!(matches!(result, Err(ExplorerError::NotFound(code)) if code == "CAN"));
        let (stats, _) = client.cache_stats().await;
        assert_eq!(stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_fetch_by_code_transport_failure_propagates() {
        let (source, client) = setup();
        source.fail_codes(true);

        let result = client.fetch_by_code("CAN").await;
        assert!(matches!(result, Err(ExplorerError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetch_by_code_refetches_after_ttl() {
        let source = Arc::new(InMemorySource::recording(records()));
        let client = FetchClient::new(source.clone(), shared_cache(Duration::from_millis(30)));

        client.fetch_by_code("MEX").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.fetch_by_code("MEX").await.unwrap();

        assert_eq!(source.call_count(), 2);
        let (stats, _) = client.cache_stats().await;
        assert_eq!(stats.expirations, 1);
    }

    #[tokio::test]
    async fn test_fetch_by_codes_empty_input() {
        let (source, client) = setup();

        assert!(client.fetch_by_codes(&[]).await.is_empty());
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_by_codes_only_requests_uncached() {
        let (source, client) = setup();
        client.fetch_by_code("AAA").await.unwrap();

        let result = client.fetch_by_codes(&codes(&["AAA", "BBB"])).await;

        let resolved: Vec<&str> = result.iter().map(|r| r.cca3.as_str()).collect();
        assert_eq!(resolved, vec!["AAA", "BBB"]);
        assert_eq!(
            source.calls(),
            vec![
                SourceCall::Code("AAA".to_string()),
                SourceCall::Codes(codes(&["BBB"])),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_by_codes_preserves_input_order() {
        let (source, client) = setup();

        let result = client.fetch_by_codes(&codes(&["MEX", "AAA", "CAN"])).await;

        let resolved: Vec<&str> = result.iter().map(|r| r.cca3.as_str()).collect();
        assert_eq!(resolved, vec!["MEX", "AAA", "CAN"]);
        assert_eq!(source.call_count(), 1);

        // Fully cached now
        client.fetch_by_codes(&codes(&["CAN", "MEX"])).await;
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_by_codes_stats_count_each_code_once() {
        let (_, client) = setup();

        client.fetch_by_codes(&codes(&["CAN", "MEX"])).await;
        let (stats, _) = client.cache_stats().await;
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 2);

        client.fetch_by_codes(&codes(&["CAN", "MEX"])).await;
        let (stats, _) = client.cache_stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn test_fetch_by_codes_batch_failure_omits_codes() {
        let (source, client) = setup();
        client.fetch_by_code("AAA").await.unwrap();
        source.fail_batches(true);

        let result = client.fetch_by_codes(&codes(&["AAA", "ZZZ"])).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].cca3, "AAA");
    }

    #[tokio::test]
    async fn test_fetch_by_codes_drops_unknown_codes() {
        let (_, client) = setup();

        let result = client.fetch_by_codes(&codes(&["CAN", "ZZZ", "MEX"])).await;

        let resolved: Vec<&str> = result.iter().map(|r| r.cca3.as_str()).collect();
        assert_eq!(resolved, vec!["CAN", "MEX"]);
    }

    #[tokio::test]
    async fn test_fetch_by_codes_accepts_lowercase_codes() {
        let (_, client) = setup();

        let result = client.fetch_by_codes(&codes(&["can"])).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].cca3, "CAN");
    }

    #[tokio::test]
    async fn test_load_country_resolves_neighbors() {
        let (source, client) = setup();

        let details = client.load_country("USA").await.unwrap();

        assert_eq!(details.country.cca3, "USA");
        let neighbors: Vec<&str> = details.neighbors.iter().map(|n| n.cca3.as_str()).collect();
        assert_eq!(neighbors, vec!["CAN", "MEX"]);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_compare_fetches_both() {
        let (_, client) = setup();

        let cmp = client.compare("CAN", "MEX").await.unwrap();
        assert_eq!(cmp.first.cca3, "CAN");
        assert_eq!(cmp.second.cca3, "MEX");

        assert!(client.compare("CAN", "ZZZ").await.is_err());
    }
}
