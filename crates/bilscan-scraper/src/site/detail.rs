//! Detail-page enrichment for a single listing.

use bilscan_core::{EnrichedRecord, ListingReference};

use crate::parse::parse_detail;

use super::SiteClient;

impl SiteClient {
    /// Fetches a listing's detail page and extracts price, seller, mileage,
    /// first registration and vehicle identifier.
    ///
    /// Never fails: if the page cannot be fetched the record comes back with
    /// every field unset, and each field the page lacks stays unset.
    pub async fn enrich(&self, listing: ListingReference) -> EnrichedRecord {
        match self.fetch_html(&listing.url, self.detail_timeout).await {
            Ok(html) => parse_detail(&html).into_record(listing),
            Err(e) => {
                tracing::warn!(
                    listing_id = %listing.id,
                    url = %listing.url,
                    error = %e,
                    "detail page failed; keeping listing unenriched"
                );
                EnrichedRecord::bare(listing)
            }
        }
    }
}
