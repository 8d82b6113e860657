//! Fetch Module
//!
//! Cached country lookups with alias normalization and batched code fetches.

mod alias;
mod client;

pub use alias::{normalize_name, COUNTRY_ALIASES};
pub use client::FetchClient;
