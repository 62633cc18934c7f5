//! String folding and ordering used by search and sort.

use chrono::NaiveDate;
use std::cmp::Ordering;

/// Lowercases and strips the diacritics used in Portuguese text.
pub fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ñ' => 'n',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}

/// Locale-style comparison: accents and case only break ties.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// ISO-ordered key for the date formats found in the data
/// (`DD/MM/YYYY`, `YYYY-MM-DD`, `DD/MM`).
pub fn date_sort_key(raw: &str) -> String {
    let raw = raw.trim();
    for format in ["%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.split('/').rev().collect::<Vec<_>>().join("-")
}

/// Case-insensitive substring test; `needle` must already be lowercased.
pub fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}
