//! REST Countries source
//!
//! reqwest-backed implementation of [`CountrySource`] for the v3.1 API.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use super::{parse_records, CountrySource};
use crate::error::{ExplorerError, Result};
use crate::models::CountryRecord;

/// Client for `GET /name/{name}`, `GET /alpha/{code}` and `GET /alpha?codes=`.
///
/// No timeout is configured beyond reqwest's defaults.
#[derive(Debug, Clone)]
pub struct RestCountriesSource {
    client: Client,
    base_url: Url,
}

impl RestCountriesSource {
    /// Creates a source rooted at `base_url` (e.g. `https://restcountries.com/v3.1`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ExplorerError::InvalidRequest(format!("invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ExplorerError::InvalidRequest(format!(
                "base URL cannot carry a path: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("country_explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ExplorerError::Internal("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn batch_endpoint(&self, codes: &[String]) -> Result<Url> {
        let mut url = self.endpoint(&["alpha"])?;
        url.query_pairs_mut().append_pair("codes", &codes.join(","));
        Ok(url)
    }

    async fn get_records(&self, url: Url) -> Result<Vec<CountryRecord>> {
        debug!(%url, "requesting country data");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        Ok(parse_records(payload))
    }
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    async fn by_name(&self, name: &str) -> Result<Vec<CountryRecord>> {
        let url = self.endpoint(&["name", name])?;
        self.get_records(url).await
    }

    async fn by_code(&self, code: &str) -> Result<Vec<CountryRecord>> {
        let url = self.endpoint(&["alpha", code])?;
        self.get_records(url).await
    }

    async fn by_codes(&self, codes: &[String]) -> Result<Vec<CountryRecord>> {
        let url = self.batch_endpoint(codes)?;
        self.get_records(url).await
    }
}
