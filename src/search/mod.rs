//! Search Module
//!
//! Debounced incremental search over the fetch client.

mod controller;
mod debounce;

use std::time::Duration;

use serde::Serialize;

pub use controller::{ClearHandler, SearchController, SelectHandler};
pub use debounce::Debouncer;

use crate::config::Config;
use crate::fetch::FetchClient;
use crate::models::{CountryRecord, CountrySummary};

// == Search Config ==
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period before a lookup is issued
    pub debounce: Duration,
    /// Minimum trimmed query length
    pub min_query_len: usize,
    /// Maximum suggestions shown
    pub max_suggestions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            max_suggestions: 5,
        }
    }
}

impl From<&Config> for SearchConfig {
    fn from(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
            max_suggestions: config.max_suggestions,
        }
    }
}

// == Panel ==
/// What the suggestion panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "suggestions", rename_all = "snake_case")]
pub enum Panel {
    Hidden,
    Suggestions(Vec<CountrySummary>),
    NoMatches,
}

impl Panel {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Panel::Hidden)
    }

    /// Suggestions shown, empty unless the panel lists matches.
    pub fn suggestions(&self) -> &[CountrySummary] {
        match self {
            Panel::Suggestions(list) => list,
            _ => &[],
        }
    }
}

/// Builds the panel for a lookup result: the first `max` matches in source
/// order, or the "no matches" placeholder.
pub fn rank_suggestions(results: &[CountryRecord], max: usize) -> Panel {
    if results.is_empty() {
        return Panel::NoMatches;
    }
    Panel::Suggestions(results.iter().take(max).map(CountrySummary::from).collect())
}

/// One-shot suggestion lookup without debouncing.
///
/// Applies the same length guard and bound as [`SearchController`].
pub async fn suggest(client: &FetchClient, raw: &str, config: &SearchConfig) -> Panel {
    let query = raw.trim();
    if query.chars().count() < config.min_query_len {
        return Panel::Hidden;
    }
    let results = client.search_by_name(query).await;
    rank_suggestions(&results, config.max_suggestions)
}
