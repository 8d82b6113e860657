//! Common country aliases
//!
//! Maps colloquial names to the name the data source's name lookup expects.

/// Lowercase alias → canonical name.
pub const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("usa", "United States"),
    ("uk", "United Kingdom"),
    ("uae", "United Arab Emirates"),
    ("russia", "Russian Federation"),
    ("south korea", "Republic of Korea"),
    ("north korea", "Democratic People's Republic of Korea"),
    ("syria", "Syrian Arab Republic"),
    ("iran", "Iran (Islamic Republic of)"),
    ("vietnam", "Viet Nam"),
    ("laos", "Lao People's Democratic Republic"),
    ("bolivia", "Bolivia (Plurinational State of)"),
    ("venezuela", "Venezuela (Bolivarian Republic of)"),
    ("tanzania", "United Republic of Tanzania"),
    ("congo", "Democratic Republic of the Congo"),
    ("dr congo", "Democratic Republic of the Congo"),
    ("ivory coast", "Côte d'Ivoire"),
];

/// Resolves `name` through the alias table.
///
/// Matching is exact on the trimmed, lowercased input. Input without an
/// alias is returned unchanged, untrimmed included.
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| name.to_string())
}
