//! Pure helpers for pulling identifiers and numbers out of scraped text.

use std::sync::LazyLock;

use regex::Regex;

static FINNKODE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"finnkode=(\d+)").expect("valid finnkode regex"));
static ITEM_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/item/(\d+)").expect("valid item path regex"));

/// Extracts the numeric listing code from a detail-page URL.
///
/// Accepts both `...?finnkode=123` and `.../item/123` shapes, preferring the
/// query parameter when both are present.
#[must_use]
pub fn listing_id_from_url(url: &str) -> Option<String> {
    FINNKODE_PARAM
        .captures(url)
        .or_else(|| ITEM_PATH.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Keeps only the ASCII digits of `text` and parses them, so `"1 234 567 kr"`
/// becomes `1234567`. Returns `None` when no digits remain or the value
/// overflows.
#[must_use]
pub fn parse_digits(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Upper-cases a plate or chassis number and removes all whitespace.
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    (!normalized.is_empty()).then_some(normalized)
}

/// How the registry should interpret an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Registration plate, e.g. `AB12345`.
    Plate,
    /// Chassis number / VIN.
    Chassis,
}

impl IdentifierKind {
    /// Classifies a normalized identifier: exactly seven characters with two
    /// leading letters is a plate, anything else a chassis number.
    #[must_use]
    pub fn classify(normalized: &str) -> Self {
        let mut chars = normalized.chars();
        let leading_letters = chars.next().is_some_and(char::is_alphabetic)
            && chars.next().is_some_and(char::is_alphabetic);
        if normalized.chars().count() == 7 && leading_letters {
            Self::Plate
        } else {
            Self::Chassis
        }
    }

    /// Query parameter name the registry expects for this kind.
    #[must_use]
    pub fn query_param(self) -> &'static str {
        match self {
            Self::Plate => "kjennemerke",
            Self::Chassis => "understellsnummer",
        }
    }
}
