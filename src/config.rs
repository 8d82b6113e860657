//! Configuration Module
//!
//! Handles loading explorer configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default base URL of the REST Countries API.
pub const DEFAULT_API_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Explorer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the country data source
    pub api_base_url: String,
    /// Lookup cache TTL in seconds, shared by every key
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Search debounce window in milliseconds
    pub debounce_ms: u64,
    /// Minimum trimmed query length before a lookup is issued
    pub min_query_len: usize,
    /// Maximum number of suggestions shown
    pub max_suggestions: usize,
    /// Local JSON dump served instead of the remote source
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Country data source (default: https://restcountries.com/v3.1)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEBOUNCE_MS` - Search debounce window (default: 300)
    /// - `MIN_QUERY_LEN` - Minimum query length (default: 2)
    /// - `MAX_SUGGESTIONS` - Suggestions shown per query (default: 5)
    /// - `DATA_FILE` - Serve countries from a local JSON dump (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            debounce_ms: parse_var("DEBOUNCE_MS").unwrap_or(defaults.debounce_ms),
            min_query_len: parse_var("MIN_QUERY_LEN").unwrap_or(defaults.min_query_len),
            max_suggestions: parse_var("MAX_SUGGESTIONS").unwrap_or(defaults.max_suggestions),
            data_file: env::var("DATA_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_ttl: 3600,
            server_port: 3000,
            debounce_ms: 300,
            min_query_len: 2,
            max_suggestions: 5,
            data_file: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
