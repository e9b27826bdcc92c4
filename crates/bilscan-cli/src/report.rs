//! Plain-text rendering of an aggregate view.

use bilscan_core::{country_of, AggregateView, EnrichedRecord};

const EMPTY: &str = "-";

fn or_empty(value: Option<&str>) -> &str {
    value.unwrap_or(EMPTY)
}

fn number_or_empty(value: Option<i64>) -> String {
    value.map_or_else(|| EMPTY.to_string(), |n| n.to_string())
}

fn record_line(record: &EnrichedRecord) -> String {
    format!(
        "{:<12} {:>10} {:>9} {:<12} {:<18} {:<16} {}",
        record.listing.id,
        number_or_empty(record.price),
        number_or_empty(record.mileage),
        or_empty(record.first_registered.as_deref()),
        or_empty(record.vehicle_identifier.as_deref()),
        country_of(record),
        or_empty(record.seller.as_deref()),
    )
}

/// Renders the country histogram followed by one line per record.
pub(crate) fn render(view: &AggregateView) -> String {
    let mut lines = Vec::with_capacity(view.histogram.len() + view.records.len() + 4);

    lines.push(format!("Countries (filter: {})", view.selected_filter));
    lines.extend(
        view.histogram
            .iter()
            .map(|entry| format!("  {:<24} {:>5}", entry.country, entry.count)),
    );
    lines.push(String::new());
    lines.push(format!(
        "{:<12} {:>10} {:>9} {:<12} {:<18} {:<16} {}",
        "listing", "price", "km", "first reg.", "identifier", "country", "seller"
    ));
    lines.extend(view.records.iter().map(record_line));
    lines.push(format!("{} listing(s)", view.records.len()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
