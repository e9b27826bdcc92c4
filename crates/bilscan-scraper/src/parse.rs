//! HTML extraction for search result pages and listing detail pages.
//!
//! Every function here is synchronous and owns its parsed document, so no
//! DOM handle is ever held across an `.await`.

use std::sync::LazyLock;

use bilscan_core::{lookup, EnrichedRecord, ListingReference, PathStep};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::identifier::{normalize_identifier, parse_digits};

/// Marker the seller payload uses for an unknown value.
pub const MISSING_MARKER: &str = "Mangler";

const PRICE_LABEL: &str = "Totalpris";
const SPEC_HEADINGS: &[&str] = &["Spesifikasjoner", "Specifications"];
const MILEAGE_KEYS: &[&str] = &["Kilometerstand", "Odometer reading"];
const FIRST_REGISTERED_KEYS: &[&str] = &["1. gang registrert", "First registered"];
const REGISTRATION_KEYS: &[&str] = &["Registreringsnr.", "Registration no."];
const CHASSIS_KEYS: &[&str] = &["Chassis nr. (VIN)", "Chassis no. (VIN)"];

const SELLER_PATH: [PathStep<'static>; 2] =
    [PathStep::Key("companyProfile"), PathStep::Key("orgName")];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static LISTING_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a[href*='/mobility/item/']"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h2, h3"));
static TERM: LazyLock<Selector> = LazyLock::new(|| selector("dt"));
static SELLER_PAYLOAD: LazyLock<Selector> =
    LazyLock::new(|| selector("script[data-company-profile-data]"));
static PRIVATE_SELLER: LazyLock<Selector> =
    LazyLock::new(|| selector("div[data-testid='private-seller-name']"));

/// Absolute URLs of every detail-page link on a search results page, in
/// document order. Relative links are resolved against `base`.
#[must_use]
pub fn listing_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&LISTING_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(String::from)
        .collect()
}

/// Fields scraped from one detail page. Each is extracted independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub price: Option<i64>,
    pub seller: Option<String>,
    pub mileage: Option<i64>,
    pub first_registered: Option<String>,
    pub vehicle_identifier: Option<String>,
}

impl DetailFields {
    #[must_use]
    pub fn into_record(self, listing: ListingReference) -> EnrichedRecord {
        EnrichedRecord {
            listing,
            price: self.price,
            seller: self.seller,
            mileage: self.mileage,
            first_registered: self.first_registered,
            vehicle_identifier: self.vehicle_identifier,
            registry: None,
        }
    }
}

/// Extracts price, seller and the specification block from a detail page.
#[must_use]
pub fn parse_detail(html: &str) -> DetailFields {
    let document = Html::parse_document(html);
    let mut fields = DetailFields {
        price: total_price(&document),
        seller: seller_name(&document),
        ..DetailFields::default()
    };
    read_specifications(&document, &mut fields);
    fields
}

/// Text of `el` with each text node trimmed and the pieces concatenated.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

fn next_sibling_named<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == name)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The `<p>Totalpris</p>` label is followed by an `<h2>` whose `<span>`
/// holds the formatted amount.
fn total_price(document: &Html) -> Option<i64> {
    let label = document
        .select(&PARAGRAPH)
        .find(|p| stripped_text(*p) == PRICE_LABEL)?;
    let heading = next_sibling_named(label, "h2")?;
    let amount = heading.select(&SPAN).next()?;
    parse_digits(&amount.text().collect::<String>())
}

fn seller_name(document: &Html) -> Option<String> {
    let name = company_name(document)
        .filter(|name| !name.trim().is_empty() && name != MISSING_MARKER)
        .or_else(|| {
            document
                .select(&PRIVATE_SELLER)
                .next()
                .map(stripped_text)
        })?;
    if name == MISSING_MARKER {
        return None;
    }
    let name = collapse_whitespace(&name);
    (!name.is_empty()).then_some(name)
}

/// Organization name from the embedded company profile payload.
fn company_name(document: &Html) -> Option<String> {
    let script = document.select(&SELLER_PAYLOAD).next()?;
    let raw: String = script.text().collect();
    let payload: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "company profile payload is not valid JSON");
            return None;
        }
    };
    lookup(&payload, &SELLER_PATH)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

fn key_matches(key: &str, aliases: &[&str]) -> bool {
    aliases.iter().any(|alias| key.contains(alias))
}

/// Reads the definition list following the specifications heading.
///
/// The stored identifier is the registration number when present, else the
/// chassis number.
fn read_specifications(document: &Html, fields: &mut DetailFields) {
    let Some(heading) = document.select(&HEADING).find(|h| {
        let text: String = h.text().collect();
        SPEC_HEADINGS.iter().any(|label| text.contains(label))
    }) else {
        return;
    };
    let Some(list) = next_sibling_named(heading, "dl") else {
        return;
    };

    let mut registration = None;
    let mut chassis = None;
    for term in list.select(&TERM) {
        let Some(definition) = next_sibling_named(term, "dd") else {
            continue;
        };
        let key = stripped_text(term);
        let value = stripped_text(definition);

        if key_matches(&key, MILEAGE_KEYS) {
            fields.mileage = parse_digits(&value);
        } else if key_matches(&key, FIRST_REGISTERED_KEYS) {
            fields.first_registered = Some(value).filter(|v| !v.is_empty());
        } else if key_matches(&key, REGISTRATION_KEYS) {
            registration = normalize_identifier(&value);
        } else if key_matches(&key, CHASSIS_KEYS) {
            chassis = normalize_identifier(&value);
        }
    }
    fields.vehicle_identifier = registration.or(chassis);
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
