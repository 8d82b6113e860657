//! Request DTOs for the explorer gateway
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string for suggestion lookups (GET /search?q=...)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Raw text typed by the user
    #[serde(default)]
    pub q: String,
}

impl SearchQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.q.len() > 256 {
            return Some("Query exceeds maximum length of 256 characters".to_string());
        }
        None
    }
}

/// Validates an alpha code path parameter.
///
/// Returns an error message if the code is not 2-3 ASCII letters.
pub fn validate_code(code: &str) -> Option<String> {
    let valid = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
    if valid {
        None
    } else {
        Some(format!("'{}' is not a valid country code", code))
    }
}
