//! Error types for the country explorer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Explorer Error Enum ==
/// Unified error type for lookups and the gateway.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// No country matches the requested code
    #[error("Country not found: {0}")]
    NotFound(String),

    /// The data source answered with a non-success status
    #[error("Upstream responded with status {0}")]
    Status(u16),

    /// Network failure or undecodable payload
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ExplorerError::Status(status.as_u16()),
            None => ExplorerError::Transport(err.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExplorerError::NotFound(_) => StatusCode::NOT_FOUND,
            ExplorerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ExplorerError::Status(_) | ExplorerError::Transport(_) => StatusCode::BAD_GATEWAY,
            ExplorerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the country explorer.
pub type Result<T> = std::result::Result<T, ExplorerError>;
