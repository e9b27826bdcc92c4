//! Three-stage scan pipeline: discover → enrich → correlate.
//!
//! 1. Page through search results and collect unique listings.
//! 2. Fetch every detail page through a fixed-width pool.
//! 3. Look up every extracted identifier in the registry through a second
//!    pool of the same width.
//!
//! Stage 3 starts only after every stage-2 task has finished. No stage
//! returns an error: failures degrade the affected page, record or field.

use bilscan_core::{AppConfig, Batch, EnrichedRecord, ListingReference};

use crate::error::ScraperError;
use crate::pool::fan_out;
use crate::registry::RegistryClient;
use crate::site::SiteClient;

pub struct Scanner {
    site: SiteClient,
    /// `None` when no registry API key is configured.
    registry: Option<RegistryClient>,
    workers: usize,
}

impl Scanner {
    #[must_use]
    pub fn new(site: SiteClient, registry: Option<RegistryClient>, workers: usize) -> Self {
        Self {
            site,
            registry,
            workers: workers.max(1),
        }
    }

    /// Builds a scanner with one shared client for the site and one for the
    /// registry. Correlation is disabled when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if either HTTP client cannot be built or the
    /// registry URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let site = SiteClient::new(
            &config.user_agent,
            &config.accept_language,
            config.search_timeout_secs,
            config.detail_timeout_secs,
        )?;

        let registry = match config.registry_api_key.as_deref() {
            Some(key) => Some(RegistryClient::new(
                &config.registry_base_url,
                key,
                config.registry_timeout_secs,
            )?),
            None => {
                tracing::warn!(
                    "BILSCAN_REGISTRY_API_KEY not set; registry correlation disabled"
                );
                None
            }
        };

        Ok(Self::new(site, registry, config.max_workers))
    }

    /// Collects up to `max_results` unique listings. See [`SiteClient::discover`].
    pub async fn discover(&self, search_url: &str, max_results: usize) -> Vec<ListingReference> {
        self.site.discover(search_url, max_results).await
    }

    /// Enriches every listing from its detail page, in completion order.
    ///
    /// Always returns exactly one record per input listing.
    pub async fn enrich_all(&self, listings: Vec<ListingReference>) -> Batch {
        let total = listings.len();
        let records = fan_out(listings, self.workers, |listing| self.site.enrich(listing)).await;

        let with_identifier = correlatable(&records);
        tracing::info!(total, with_identifier, "detail enrichment finished");
        records
    }

    /// Attaches a registry document to every record carrying a vehicle
    /// identifier. Records without one are not looked up and keep an empty
    /// registry field, as does any record whose lookup fails.
    ///
    /// Record order is preserved.
    pub async fn correlate_all(&self, mut records: Batch) -> Batch {
        let Some(registry) = &self.registry else {
            return records;
        };

        let jobs: Vec<(usize, String)> = records
            .iter()
            .enumerate()
            .filter_map(|(slot, r)| r.vehicle_identifier.clone().map(|id| (slot, id)))
            .collect();
        let submitted = jobs.len();

        let results = fan_out(jobs, self.workers, |(slot, identifier)| async move {
            (slot, registry.lookup(&identifier).await)
        })
        .await;

        let mut found = 0usize;
        for (slot, registry_record) in results {
            found += usize::from(registry_record.is_some());
            records[slot].registry = registry_record;
        }

        tracing::info!(submitted, found, "registry correlation finished");
        records
    }

    /// Runs all three stages for one search and returns the finished batch.
    pub async fn scan(&self, search_url: &str, max_results: usize) -> Batch {
        let listings = self.discover(search_url, max_results).await;
        let records = self.enrich_all(listings).await;
        self.correlate_all(records).await
    }
}

/// Records in `batch` that stage 3 would submit for lookup.
#[must_use]
pub fn correlatable(batch: &[EnrichedRecord]) -> usize {
    batch
        .iter()
        .filter(|r| r.vehicle_identifier.is_some())
        .count()
}
