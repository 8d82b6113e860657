//! API Handlers
//!
//! HTTP request handlers for each explorer gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::shared_cache;
use crate::config::Config;
use crate::error::{ExplorerError, Result};
use crate::fetch::FetchClient;
use crate::models::{
    validate_code, Comparison, CountryDetails, HealthResponse, SearchQuery, SearchResponse,
    StatsResponse,
};
use crate::search::{suggest, SearchConfig};
use crate::source::{CountrySource, InMemorySource, RestCountriesSource};

/// Application state shared across all handlers.
///
/// Cloning is cheap: the fetch client shares its source and cache.
#[derive(Clone)]
pub struct AppState {
    /// Cached lookups over the country data source
    pub client: FetchClient,
    /// Length guard and bound applied to suggestion lookups
    pub search: SearchConfig,
}

impl AppState {
    /// Creates a new AppState around an existing fetch client.
    pub fn new(client: FetchClient, search: SearchConfig) -> Self {
        Self { client, search }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Serves the local dump named by `data_file` when set, the remote
    /// source otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source: Arc<dyn CountrySource> = match &config.data_file {
            Some(path) => {
                let source = InMemorySource::from_json_file(path)?;
                info!("Loaded {} countries from {}", source.len(), path.display());
                Arc::new(source)
            }
            None => Arc::new(RestCountriesSource::new(&config.api_base_url)?),
        };

        let client = FetchClient::new(source, shared_cache(config.cache_ttl()));
        Ok(Self::new(client, SearchConfig::from(config)))
    }
}

fn checked_code(code: &str) -> Result<String> {
    match validate_code(code) {
        Some(error_msg) => Err(ExplorerError::InvalidRequest(error_msg)),
        None => Ok(code.to_ascii_uppercase()),
    }
}

/// Handler for GET /search?q=
///
/// Returns the suggestion panel for the query.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(ExplorerError::InvalidRequest(error_msg));
    }

    let panel = suggest(&state.client, &query.q, &state.search).await;
    Ok(Json(SearchResponse::new(query.q.trim(), panel)))
}

/// Handler for GET /country/:code
///
/// Returns the country with its neighbors and derived insights.
pub async fn country_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CountryDetails>> {
    let code = checked_code(&code)?;
    let details = state.client.load_country(&code).await?;

    Ok(Json(details))
}

/// Handler for GET /compare/:first/:second
pub async fn compare_handler(
    State(state): State<AppState>,
    Path((first, second)): Path<(String, String)>,
) -> Result<Json<Comparison>> {
    let first = checked_code(&first)?;
    let second = checked_code(&second)?;
    let comparison = state.client.compare(&first, &second).await?;

    Ok(Json(comparison))
}

/// Handler for GET /stats
///
/// Returns current lookup cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (stats, ttl) = state.client.cache_stats().await;

    Json(StatsResponse::new(&stats, ttl.as_secs()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_TTL;
    use crate::models::country::fixtures::country;
    use crate::search::Panel;

    fn test_state() -> (Arc<InMemorySource>, AppState) {
        let mut peru = country("PER", "Peru", 33_000_000, 1_285_216.0);
        peru.borders = vec!["BOL".to_string(), "CHL".to_string()];
        let source = Arc::new(InMemorySource::recording(vec![
            peru,
            country("BOL", "Bolivia", 12_000_000, 1_098_581.0),
            country("CHL", "Chile", 19_000_000, 756_102.0),
        ]));
        let client = FetchClient::new(source.clone(), shared_cache(DEFAULT_TTL));
        (source, AppState::new(client, SearchConfig::default()))
    }

    #[tokio::test]
    async fn test_search_handler() {
        let (_, state) = test_state();

        let query = SearchQuery { q: " per ".to_string() };
        let response = search_handler(State(state), Query(query)).await.unwrap();

        assert_eq!(response.query, "per");
        assert_eq!(response.panel.suggestions()[0].cca3, "PER");
    }

    #[tokio::test]
    async fn test_search_handler_short_query() {
        let (source, state) = test_state();

        let query = SearchQuery { q: "p".to_string() };
        let response = search_handler(State(state), Query(query)).await.unwrap();

        assert_eq!(response.panel, Panel::Hidden);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_country_handler_with_neighbors() {
        let (_, state) = test_state();

        let response = country_handler(State(state), Path("per".to_string()))
            .await
            .unwrap();

        assert_eq!(response.country.cca3, "PER");
        assert_eq!(response.neighbors.len(), 2);
        assert_eq!(response.insights.neighbor_count, 2);
    }

    #[tokio::test]
    async fn test_country_handler_not_found() {
        let (_, state) = test_state();

        let result = country_handler(State(state), Path("ZZZ".to_string())).await;
        assert!(matches!(result, Err(ExplorerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_country_handler_invalid_code() {
        let (source, state) = test_state();

        let result = country_handler(State(state), Path("P3R".to_string())).await;
        assert!(matches!(result, Err(ExplorerError::InvalidRequest(_))));
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_compare_handler() {
        let (_, state) = test_state();

        let response = compare_handler(
            State(state),
            Path(("BOL".to_string(), "CHL".to_string())),
        )
        .await
        .unwrap();

        assert_eq!(response.first.cca3, "BOL");
        assert_eq!(response.second.cca3, "CHL");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (_, state) = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.ttl_seconds, 3600);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_from_config_missing_data_file() {
        let config = Config {
            data_file: Some("/nonexistent/countries.json".into()),
            ..Config::default()
        };
        assert!(AppState::from_config(&config).is_err());
    }
}
