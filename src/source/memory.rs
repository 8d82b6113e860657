//! In-memory source
//!
//! Serves a fixed set of records, e.g. a local REST Countries dump. A
//! recording instance also logs every request it receives.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{parse_records, CountrySource};
use crate::error::{ExplorerError, Result};
use crate::models::CountryRecord;

/// A request received by an [`InMemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Name(String),
    Code(String),
    Codes(Vec<String>),
}

#[derive(Debug, Default)]
struct Behavior {
    /// Operations answered with a transport failure
    failing: HashSet<&'static str>,
    /// Artificial delay per name query
    latency: HashMap<String, Duration>,
}

/// Country source backed by a list of records.
///
/// Matching mimics REST Countries: names match case-insensitively on any
/// part of the common or official name, codes match alpha-3 or alpha-2, and
/// an empty name or code lookup answers 404.
///
/// Only instances built with [`InMemorySource::recording`] keep a call log
/// and answer batches in reverse order.
#[derive(Debug, Default)]
pub struct InMemorySource {
    records: Vec<CountryRecord>,
    recording: bool,
    calls: Mutex<Vec<SourceCall>>,
    behavior: Mutex<Behavior>,
}

const BY_NAME: &str = "by_name";
const BY_CODE: &str = "by_code";
const BY_CODES: &str = "by_codes";

impl InMemorySource {
    pub fn new(records: Vec<CountryRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// A source that logs every request, for asserting on traffic.
    pub fn recording(records: Vec<CountryRecord>) -> Self {
        Self {
            records,
            recording: true,
            ..Self::default()
        }
    }

    /// Loads records from a JSON dump such as the output of `GET /all`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExplorerError::Internal(format!("cannot read {}: {}", path.display(), e))
        })?;
        let payload = serde_json::from_str(&raw).map_err(|e| {
            ExplorerError::Internal(format!("cannot parse {}: {}", path.display(), e))
        })?;
        Ok(Self::new(parse_records(payload)))
    }

    /// Makes batch lookups fail with a transport error.
    pub fn fail_batches(&self, failing: bool) {
        self.set_failing(BY_CODES, failing);
    }

    /// Makes single-code lookups fail with a transport error.
    pub fn fail_codes(&self, failing: bool) {
        self.set_failing(BY_CODE, failing);
    }

    /// Makes name lookups fail with a transport error.
    pub fn fail_names(&self, failing: bool) {
        self.set_failing(BY_NAME, failing);
    }

    /// Delays the answer to the name query `name` (matched verbatim).
    pub fn delay_name(&self, name: impl Into<String>, delay: Duration) {
        lock(&self.behavior).latency.insert(name.into(), delay);
    }

    /// Every request received so far, oldest first. Always empty unless
    /// recording.
    pub fn calls(&self) -> Vec<SourceCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn set_failing(&self, op: &'static str, failing: bool) {
        let mut behavior = lock(&self.behavior);
        if failing {
            behavior.failing.insert(op);
        } else {
            behavior.failing.remove(op);
        }
    }

    fn record(&self, call: SourceCall) {
        if self.recording {
            lock(&self.calls).push(call);
        }
    }

    fn check_failure(&self, op: &'static str) -> Result<()> {
        if lock(&self.behavior).failing.contains(op) {
            return Err(ExplorerError::Transport(format!("{} unavailable", op)));
        }
        Ok(())
    }

    fn find_code(&self, code: &str) -> Option<&CountryRecord> {
        self.records.iter().find(|r| {
            r.cca3.eq_ignore_ascii_case(code)
                || r.cca2.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(code))
        })
    }
}

#[async_trait]
impl CountrySource for InMemorySource {
    async fn by_name(&self, name: &str) -> Result<Vec<CountryRecord>> {
        self.record(SourceCall::Name(name.to_string()));

        let delay = lock(&self.behavior).latency.get(name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failure(BY_NAME)?;

        let needle = name.to_lowercase();
        let matches: Vec<CountryRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.name.common.to_lowercase().contains(&needle)
                    || r.name.official.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(ExplorerError::Status(404));
        }
        Ok(matches)
    }

    async fn by_code(&self, code: &str) -> Result<Vec<CountryRecord>> {
        self.record(SourceCall::Code(code.to_string()));
        self.check_failure(BY_CODE)?;

        match self.find_code(code) {
            Some(record) => Ok(vec![record.clone()]),
            None => Err(ExplorerError::Status(404)),
        }
    }

    async fn by_codes(&self, codes: &[String]) -> Result<Vec<CountryRecord>> {
        self.record(SourceCall::Codes(codes.to_vec()));
        self.check_failure(BY_CODES)?;

        let mut records: Vec<CountryRecord> = codes
            .iter()
            .filter_map(|code| self.find_code(code).cloned())
            .collect();
        if self.recording {
            // Callers must not depend on the order of a batch answer
            records.reverse();
        }
        Ok(records)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::country::fixtures::country;

    fn source() -> InMemorySource {
        InMemorySource::recording(vec![
            country("FRA", "France", 67_000_000, 551_695.0),
            country("FIN", "Finland", 5_500_000, 338_424.0),
        ])
    }

    #[tokio::test]
    async fn test_by_name_partial_match() {
        let source = source();

        let results = source.by_name("fr").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cca3, "FRA");

        // "Official France", "Official Finland"
        assert_eq!(source.by_name("official").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_by_name_no_match_is_404() {
        let result = source().by_name("atlantis").await;
        assert!(matches!(result, Err(ExplorerError::Status(404))));
    }

    #[tokio::test]
    async fn test_by_code_and_calls() {
        let source = source();

        assert_eq!(source.by_code("fin").await.unwrap()[0].cca3, "FIN");
        assert!(matches!(
            source.by_code("ZZZ").await,
            Err(ExplorerError::Status(404))
        ));
        assert_eq!(
            source.calls(),
            vec![
                SourceCall::Code("fin".to_string()),
                SourceCall::Code("ZZZ".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let source = source();
        source.fail_batches(true);

        let codes = vec!["FRA".to_string()];
        assert!(matches!(
            source.by_codes(&codes).await,
            Err(ExplorerError::Transport(_))
        ));

        source.fail_batches(false);
        assert_eq!(source.by_codes(&codes).await.unwrap().len(), 1);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_plain_source_keeps_no_call_log() {
        let source = InMemorySource::new(vec![
            country("FRA", "France", 67_000_000, 551_695.0),
            country("FIN", "Finland", 5_500_000, 338_424.0),
        ]);

        for _ in 0..100 {
            let _ = source.by_name("atlantis").await;
        }
        let codes = vec!["FRA".to_string(), "FIN".to_string()];
        let batch = source.by_codes(&codes).await.unwrap();

        assert_eq!(source.call_count(), 0);
        assert!(source.calls().is_empty());
        let order: Vec<&str> = batch.iter().map(|r| r.cca3.as_str()).collect();
        assert_eq!(order, vec!["FRA", "FIN"]);
    }

    #[tokio::test]
    async fn test_recording_source_reverses_batches() {
        let source = source();
        let codes = vec!["FRA".to_string(), "FIN".to_string()];

        let batch = source.by_codes(&codes).await.unwrap();

        let order: Vec<&str> = batch.iter().map(|r| r.cca3.as_str()).collect();
        assert_eq!(order, vec!["FIN", "FRA"]);
        assert_eq!(source.calls(), vec![SourceCall::Codes(codes)]);
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = InMemorySource::from_json_file("/nonexistent/countries.json");
        assert!(matches!(result, Err(ExplorerError::Internal(_))));
    }
}
