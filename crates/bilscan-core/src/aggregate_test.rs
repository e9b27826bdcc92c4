use serde_json::json;

use super::*;
use crate::listing::{ListingReference, RegistryRecord};

fn record(id: &str, price: Option<i64>, registry: Option<serde_json::Value>) -> EnrichedRecord {
    let mut r = EnrichedRecord::bare(ListingReference {
        id: id.to_string(),
        url: format!("https://www.finn.no/mobility/item/{id}"),
    });
    r.price = price;
    r.registry = registry.map(RegistryRecord);
    r
}

fn imported_from(country: &str) -> serde_json::Value {
    json!({
        "godkjenning": {
            "forstegangsGodkjenning": {
                "bruktimport": { "importland": { "landNavn": country } }
            }
        }
    })
}

fn domestic() -> serde_json::Value {
    json!({ "godkjenning": { "forstegangsGodkjenning": {} } })
}

fn ids(view: &AggregateView) -> Vec<&str> {
    view.records.iter().map(|r| r.listing.id.as_str()).collect()
}

fn sample_batch() -> Vec<EnrichedRecord> {
    vec![
        record("1", Some(300), Some(imported_from("Tyskland"))),
        record("2", Some(100), Some(domestic())),
        record("3", None, None),
        record("4", Some(200), Some(imported_from("Sverige"))),
        record("5", Some(150), Some(imported_from("Tyskland"))),
    ]
}

#[test]
fn record_without_registry_is_unknown() {
    let r = record("1", Some(10), None);
    assert_eq!(country_of(&r), UNKNOWN_COUNTRY);
}

#[test]
fn registered_record_without_import_is_domestic() {
    let r = record("1", Some(10), Some(domestic()));
    assert_eq!(country_of(&r), DOMESTIC_COUNTRY);
}

#[test]
fn registered_record_with_import_uses_country_name() {
    let r = record("1", Some(10), Some(imported_from("Tyskland")));
    assert_eq!(country_of(&r), "Tyskland");
}

#[test]
fn filter_names_parse() {
    assert_eq!(CountryFilter::parse("all"), CountryFilter::All);
    assert_eq!(CountryFilter::parse(""), CountryFilter::All);
    assert_eq!(CountryFilter::parse("imported"), CountryFilter::Imported);
    assert_eq!(CountryFilter::parse("unknown"), CountryFilter::Unknown);
    assert_eq!(
        CountryFilter::parse("Tyskland"),
        CountryFilter::Country("Tyskland".to_string())
    );
    assert_eq!(CountryFilter::parse("Tyskland").to_string(), "Tyskland");
}

#[test]
fn unset_price_sorts_first_and_ties_keep_input_order() {
    let batch = vec![
        record("none", None, None),
        record("300", Some(300), None),
        record("100", Some(100), None),
        record("zero", Some(0), None),
    ];
    let view = aggregate(&batch, &CountryFilter::All);
    assert_eq!(ids(&view), ["none", "zero", "100", "300"]);
}

#[test]
fn histogram_counts_every_record_most_frequent_first() {
    let view = aggregate(&sample_batch(), &CountryFilter::All);
    assert_eq!(
        view.histogram[0],
        CountryCount {
            country: "Tyskland".to_string(),
            count: 2
        }
    );
    let total: usize = view.histogram.iter().map(|h| h.count).sum();
    assert_eq!(total, 5);
    // remaining single-count entries keep first-seen order
    let rest: Vec<&str> = view.histogram[1..]
        .iter()
        .map(|h| h.country.as_str())
        .collect();
    assert_eq!(rest, [DOMESTIC_COUNTRY, UNKNOWN_COUNTRY, "Sverige"]);
}

#[test]
fn countries_are_sorted_ascending() {
    let view = aggregate(&sample_batch(), &CountryFilter::All);
    assert_eq!(
        view.countries,
        [DOMESTIC_COUNTRY, "Sverige", "Tyskland", UNKNOWN_COUNTRY]
    );
}

#[test]
fn imported_excludes_domestic_and_unregistered() {
    let view = aggregate(&sample_batch(), &CountryFilter::Imported);
    assert_eq!(ids(&view), ["5", "4", "1"]);
    assert!(view
        .records
        .iter()
        .all(|r| r.registry.is_some() && country_of(r) != DOMESTIC_COUNTRY));
}

#[test]
fn unknown_keeps_only_unregistered() {
    let view = aggregate(&sample_batch(), &CountryFilter::Unknown);
    assert_eq!(ids(&view), ["3"]);
}

#[test]
fn literal_country_matches_exactly() {
    let view = aggregate(&sample_batch(), &CountryFilter::parse("Tyskland"));
    assert_eq!(ids(&view), ["5", "1"]);
    assert_eq!(view.selected_filter, "Tyskland");

    let view = aggregate(&sample_batch(), &CountryFilter::parse(DOMESTIC_COUNTRY));
    assert_eq!(ids(&view), ["2"]);
}

#[test]
fn histogram_ignores_filter() {
    let view = aggregate(&sample_batch(), &CountryFilter::Unknown);
    assert_eq!(view.histogram.len(), 4);
    assert_eq!(view.countries.len(), 4);
}

#[test]
fn empty_batch_yields_empty_view() {
    let view = aggregate(&[], &CountryFilter::All);
    assert!(view.records.is_empty());
    assert!(view.histogram.is_empty());
    assert!(view.countries.is_empty());
    assert_eq!(view.selected_filter, "all");
}
