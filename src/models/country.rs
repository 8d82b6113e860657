//! Country record schema
//!
//! Explicit shape of a REST Countries v3.1 object. Only `name` and `cca3`
//! are required; every other field defaults when the source omits it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// == Country Record ==
/// A country as returned by the data source. Never mutated once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: CountryName,
    /// Stable alpha-3 code, the record's identity
    pub cca3: String,
    #[serde(default)]
    pub cca2: Option<String>,
    #[serde(default)]
    pub population: u64,
    /// Surface in km²
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub flags: Flags,
    /// Alpha-3 codes of neighboring countries
    #[serde(default)]
    pub borders: Vec<String>,
    /// Latitude, longitude
    #[serde(default)]
    pub latlng: Vec<f64>,
    /// Language code → language name
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    /// Currency code → currency
    #[serde(default)]
    pub currencies: BTreeMap<String, Currency>,
    #[serde(default)]
    pub tld: Vec<String>,
    #[serde(default)]
    pub un_member: bool,
    #[serde(default)]
    pub independent: Option<bool>,
    #[serde(default)]
    pub car: Option<Car>,
    #[serde(default)]
    pub timezones: Vec<String>,
    /// Language code → demonyms
    #[serde(default)]
    pub demonyms: BTreeMap<String, Demonym>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    #[serde(default)]
    pub side: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demonym {
    #[serde(default)]
    pub f: Option<String>,
    #[serde(default)]
    pub m: Option<String>,
}

impl CountryRecord {
    /// Common name of the country.
    pub fn common_name(&self) -> &str {
        &self.name.common
    }

    /// First listed capital, if any.
    pub fn primary_capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    /// People per km², or None when population or area is unknown or zero.
    pub fn density(&self) -> Option<f64> {
        match self.area {
            Some(area) if area > 0.0 && self.population > 0 => {
                Some(self.population as f64 / area)
            }
            _ => None,
        }
    }

    /// Latitude and longitude, when the source provided both.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self.latlng.as_slice() {
            [lat, lng, ..] => Some((*lat, *lng)),
            _ => None,
        }
    }

    /// Driving side, upper-cased ("LEFT" / "RIGHT").
    pub fn driving_side(&self) -> Option<String> {
        self.car
            .as_ref()
            .and_then(|car| car.side.as_deref())
            .map(str::to_uppercase)
    }

    /// Language names, in language-code order.
    pub fn language_names(&self) -> Vec<String> {
        self.languages.values().cloned().collect()
    }

    /// Currencies rendered as "Name (symbol)".
    pub fn currency_labels(&self) -> Vec<String> {
        self.currencies
            .values()
            .map(|c| match &c.symbol {
                Some(symbol) => format!("{} ({})", c.name, symbol),
                None => c.name.clone(),
            })
            .collect()
    }

    /// English masculine demonym, the form shown in the details panel.
    pub fn demonym(&self) -> Option<&str> {
        self.demonyms.get("eng").and_then(|d| d.m.as_deref())
    }

    /// Minimal `{name, cca3, flag}` view of the record.
    pub fn summary(&self) -> CountrySummary {
        CountrySummary::from(self)
    }
}

// == Country Summary ==
/// Minimal view of a country used in suggestion lists and neighbor grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub name: String,
    pub cca3: String,
    pub flag: String,
}

impl From<&CountryRecord> for CountrySummary {
    fn from(record: &CountryRecord) -> Self {
        Self {
            name: record.name.common.clone(),
            cca3: record.cca3.clone(),
            flag: record.flags.svg.clone(),
        }
    }
}

// == Derived Insights ==
/// Facts derived from a record for the details view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryInsights {
    pub population: String,
    pub area: String,
    pub density: Option<f64>,
    pub neighbor_count: usize,
    pub capital: Option<String>,
    pub languages: Vec<String>,
    pub currencies: Vec<String>,
    pub demonym: Option<String>,
    pub driving_side: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub un_member: bool,
    pub independent: bool,
}

impl From<&CountryRecord> for CountryInsights {
    fn from(record: &CountryRecord) -> Self {
        let coordinates = record.coordinates();
        Self {
            population: format_number(record.population as f64),
            area: format_number(record.area.unwrap_or_default()),
            density: record.density(),
            neighbor_count: record.borders.len(),
            capital: record.primary_capital().map(str::to_string),
            languages: record.language_names(),
            currencies: record.currency_labels(),
            demonym: record.demonym().map(str::to_string),
            driving_side: record.driving_side(),
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lng)| lng),
            un_member: record.un_member,
            independent: record.independent.unwrap_or(false),
        }
    }
}

/// A country together with its resolved neighbors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDetails {
    pub country: CountryRecord,
    pub neighbors: Vec<CountrySummary>,
    pub insights: CountryInsights,
}

impl CountryDetails {
    pub fn new(country: CountryRecord, neighbors: &[CountryRecord]) -> Self {
        let insights = CountryInsights::from(&country);
        Self {
            neighbors: neighbors.iter().map(CountrySummary::from).collect(),
            insights,
            country,
        }
    }
}

// == Formatting ==
/// Formats a population or area figure for display.
///
/// Zero (unknown) renders as "N/A", millions are abbreviated to one decimal
/// ("83.2 M"). Anything smaller gets thousands separators and at most three
/// fraction digits ("357,114", "0.44").
pub fn format_number(value: f64) -> String {
    if value <= 0.0 || !value.is_finite() {
        return "N/A".to_string();
    }
    if value >= 1_000_000.0 {
        return format!("{:.1} M", value / 1_000_000.0);
    }

    let fixed = format!("{:.3}", value);
    let (digits, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
