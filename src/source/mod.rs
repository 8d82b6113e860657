//! Country Data Source Module
//!
//! The external data source the fetch client talks to.
//!
//! # Endpoints
//! - lookup by (partial) name
//! - lookup by a single alpha code
//! - lookup by a batch of alpha codes

mod http;
mod memory;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::models::CountryRecord;

pub use http::RestCountriesSource;
pub use memory::{InMemorySource, SourceCall};

/// Port to a country data source.
///
/// A non-success answer is reported as `ExplorerError::Status`, network or
/// decoding failures as `ExplorerError::Transport`. What to do with those is
/// the caller's decision.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Countries whose common or official name matches `name`.
    async fn by_name(&self, name: &str) -> Result<Vec<CountryRecord>>;

    /// The country for one code. The first element is the match.
    async fn by_code(&self, code: &str) -> Result<Vec<CountryRecord>>;

    /// Countries for several codes in one request. Order is not guaranteed.
    async fn by_codes(&self, codes: &[String]) -> Result<Vec<CountryRecord>>;
}

/// Decodes a source payload, skipping entries that do not fit the schema.
///
/// Accepts either an array of countries or a single country object.
pub fn parse_records(payload: Value) -> Vec<CountryRecord> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(_) => vec![payload],
        other => {
            warn!(kind = json_kind(&other), "unexpected country payload");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<CountryRecord>(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "skipping malformed country record");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
