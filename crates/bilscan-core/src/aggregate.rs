//! Country attribution, filtering and price ordering over a finished batch.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::listing::EnrichedRecord;

/// Country attributed to a registered vehicle with no import record.
pub const DOMESTIC_COUNTRY: &str = "Norway";

/// Country attributed to a record with no registry document at all.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Resolves the country of first registration or import for one record.
///
/// Records without a registry document are always [`UNKNOWN_COUNTRY`].
#[must_use]
pub fn country_of(record: &EnrichedRecord) -> String {
    match &record.registry {
        Some(registry) => registry.import_country(DOMESTIC_COUNTRY),
        None => UNKNOWN_COUNTRY.to_string(),
    }
}

/// Which records an aggregate view keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryFilter {
    All,
    /// Registered records whose country is not [`DOMESTIC_COUNTRY`].
    Imported,
    /// Records with no registry document.
    Unknown,
    /// Registered records resolved to exactly this country.
    Country(String),
}

impl CountryFilter {
    /// Parses a caller-supplied filter name. Empty input means `all`; any
    /// unrecognized name is a literal country.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "" | "all" => Self::All,
            "imported" => Self::Imported,
            "unknown" => Self::Unknown,
            other => Self::Country(other.to_string()),
        }
    }

    fn keeps(&self, record: &EnrichedRecord, country: &str) -> bool {
        let registered = record.registry.is_some();
        match self {
            Self::All => true,
            Self::Imported => registered && country != DOMESTIC_COUNTRY,
            Self::Unknown => !registered,
            Self::Country(name) => registered && country == name,
        }
    }
}

impl fmt::Display for CountryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Imported => f.write_str("imported"),
            Self::Unknown => f.write_str("unknown"),
            Self::Country(name) => f.write_str(name),
        }
    }
}

impl From<&str> for CountryFilter {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

/// The filtered, price-sorted records of a batch plus its country summary.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateView {
    pub records: Vec<EnrichedRecord>,
    /// Every country seen in the batch, ascending.
    pub countries: Vec<String>,
    /// Records per country, most frequent first.
    pub histogram: Vec<CountryCount>,
    pub selected_filter: String,
}

impl AggregateView {
    #[must_use]
    pub fn empty(filter: &CountryFilter) -> Self {
        Self {
            records: Vec::new(),
            countries: Vec::new(),
            histogram: Vec::new(),
            selected_filter: filter.to_string(),
        }
    }
}

/// Builds the country histogram over the whole batch, then applies `filter`
/// and sorts the survivors by price ascending.
///
/// An unset price sorts as `0`. Both sorts are stable, so equal keys keep
/// batch order.
#[must_use]
pub fn aggregate(batch: &[EnrichedRecord], filter: &CountryFilter) -> AggregateView {
    let resolved: Vec<String> = batch.iter().map(country_of).collect();

    let mut histogram: Vec<CountryCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for country in &resolved {
        if let Some(&slot) = slots.get(country.as_str()) {
            histogram[slot].count += 1;
        } else {
            slots.insert(country.as_str(), histogram.len());
            histogram.push(CountryCount {
                country: country.clone(),
                count: 1,
            });
        }
    }
    histogram.sort_by(|a, b| b.count.cmp(&a.count));

    let mut countries: Vec<String> = histogram.iter().map(|h| h.country.clone()).collect();
    countries.sort();

    let mut records: Vec<EnrichedRecord> = batch
        .iter()
        .zip(&resolved)
        .filter(|(record, country)| filter.keeps(record, country))
        .map(|(record, _)| record.clone())
        .collect();
    records.sort_by_key(|r| r.price.unwrap_or(0));

    AggregateView {
        records,
        countries,
        histogram,
        selected_filter: filter.to_string(),
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
