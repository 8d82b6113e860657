//! Country Explorer - country lookups over the REST Countries API
//!
//! Provides a TTL lookup cache, a batching fetch client, debounced
//! incremental search, and an HTTP gateway exposing them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod search;
pub mod source;

pub use api::AppState;
pub use cache::{shared_cache, LookupCache, SharedCache};
pub use config::Config;
pub use error::{ExplorerError, Result};
pub use fetch::FetchClient;
pub use models::CountryRecord;
pub use search::{SearchConfig, SearchController};
pub use source::{CountrySource, InMemorySource, RestCountriesSource};
