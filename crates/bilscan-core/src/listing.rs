use serde::{Deserialize, Serialize};

use crate::tree::{lookup_text, PathStep};

/// A listing found on a search results page.
///
/// `id` is the site-assigned listing code (the `finnkode`), unique within
/// one [`Batch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingReference {
    pub id: String,
    pub url: String,
}

/// One registry document as returned by the vehicle registry API.
///
/// The payload is kept untyped; only the import-country path is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryRecord(pub serde_json::Value);

/// Keys leading from a registry document to the country of first import.
const IMPORT_COUNTRY_PATH: [PathStep<'static>; 5] = [
    PathStep::Key("godkjenning"),
    PathStep::Key("forstegangsGodkjenning"),
    PathStep::Key("bruktimport"),
    PathStep::Key("importland"),
    PathStep::Key("landNavn"),
];

impl RegistryRecord {
    /// Country of first import, or `default` when the document carries no
    /// import record.
    #[must_use]
    pub fn import_country(&self, default: &str) -> String {
        lookup_text(&self.0, &IMPORT_COUNTRY_PATH, default)
    }
}

/// A listing plus everything scraped from its detail page and, once
/// correlated, its registry document.
///
/// Every enrichment field is optional: extraction fails per field, never
/// per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub listing: ListingReference,
    /// Total price in whole kroner.
    pub price: Option<i64>,
    pub seller: Option<String>,
    /// Odometer reading in kilometres.
    pub mileage: Option<i64>,
    pub first_registered: Option<String>,
    /// Registration plate or chassis number, upper-case without spaces.
    pub vehicle_identifier: Option<String>,
    pub registry: Option<RegistryRecord>,
}

impl EnrichedRecord {
    /// A record with no enrichment at all, used when the detail page
    /// cannot be fetched.
    #[must_use]
    pub fn bare(listing: ListingReference) -> Self {
        Self {
            listing,
            price: None,
            seller: None,
            mileage: None,
            first_registered: None,
            vehicle_identifier: None,
            registry: None,
        }
    }
}

/// All records produced by one scan, in completion order.
pub type Batch = Vec<EnrichedRecord>;
