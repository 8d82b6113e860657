//! Country data and gateway DTOs
//!
//! The country schema returned by the data source, values derived from it,
//! and the request/response bodies of the explorer gateway.

pub mod compare;
pub mod country;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use compare::{Comparison, MetricRow, Trend};
pub use country::{
    format_number, Car, CountryDetails, CountryInsights, CountryName, CountryRecord,
    CountrySummary, Currency, Demonym, Flags,
};
pub use requests::{validate_code, SearchQuery};
pub use responses::{HealthResponse, SearchResponse, StatsResponse};
