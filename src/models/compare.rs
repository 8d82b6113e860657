//! Side-by-side comparison of two countries.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{format_number, CountryRecord, CountrySummary};

/// How the first country's figure relates to the second's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Equal,
}

impl Trend {
    fn between(first: f64, second: f64) -> Self {
        match first.partial_cmp(&second) {
            Some(Ordering::Greater) => Trend::Up,
            Some(Ordering::Less) => Trend::Down,
            _ => Trend::Equal,
        }
    }
}

/// One metric row. `trend` is None for non-numeric metrics such as region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub first: String,
    pub second: String,
    pub trend: Option<Trend>,
}

impl MetricRow {
    fn numeric(metric: &str, first: f64, second: f64, display: impl Fn(f64) -> String) -> Self {
        Self {
            metric: metric.to_string(),
            first: display(first),
            second: display(second),
            trend: Some(Trend::between(first, second)),
        }
    }

    fn text(metric: &str, first: &str, second: &str) -> Self {
        Self {
            metric: metric.to_string(),
            first: first.to_string(),
            second: second.to_string(),
            trend: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: CountrySummary,
    pub second: CountrySummary,
    pub rows: Vec<MetricRow>,
}

impl Comparison {
    /// Compares population, area, density, region and language count.
    pub fn between(first: &CountryRecord, second: &CountryRecord) -> Self {
        let area = |c: &CountryRecord| c.area.unwrap_or_default();
        let density = |c: &CountryRecord| c.density().unwrap_or_default();

        let rows = vec![
            MetricRow::numeric(
                "Population",
                first.population as f64,
                second.population as f64,
                format_number,
            ),
            MetricRow::numeric("Area", area(first), area(second), |v| {
                format!("{} km²", format_number(v))
            }),
            MetricRow::numeric("Density", density(first), density(second), |v| {
                format!("{:.1} /km²", v)
            }),
            MetricRow::text("Region", &first.region, &second.region),
            MetricRow::numeric(
                "Languages Count",
                first.languages.len() as f64,
                second.languages.len() as f64,
                |v| format!("{}", v as usize),
            ),
        ];

        Self {
            first: first.summary(),
            second: second.summary(),
            rows,
        }
    }

    /// Looks up a row by metric name.
    pub fn row(&self, metric: &str) -> Option<&MetricRow> {
        self.rows.iter().find(|row| row.metric == metric)
    }
}
