//! Paginated listing discovery over search result pages.

use std::collections::HashSet;

use bilscan_core::ListingReference;
use reqwest::Url;

use crate::error::ScraperError;
use crate::identifier::listing_id_from_url;
use crate::parse::listing_links;

use super::{SiteClient, PAGE_SIZE};

/// Rewrites `search_url` to request result page `page`.
///
/// Any existing `page` parameters are dropped and a single `page=<n>` is
/// appended; other query pairs keep their order.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSearchUrl`] if `search_url` is not an
/// absolute `http(s)` URL.
pub fn page_url(search_url: &str, page: usize) -> Result<Url, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidSearchUrl {
        url: search_url.to_owned(),
        reason,
    };

    let mut url = Url::parse(search_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(&retained)
        .append_pair("page", &page.to_string());

    Ok(url)
}

impl SiteClient {
    /// Collects up to `max_results` unique listings from a search URL.
    ///
    /// Fetches pages `1..=ceil(max_results / PAGE_SIZE)` in order. A page
    /// that fails to load is skipped; a page with no listing links ends the
    /// scan. Links without an extractable code, and codes already seen, are
    /// skipped. Never fails: an unusable search URL yields no listings.
    pub async fn discover(&self, search_url: &str, max_results: usize) -> Vec<ListingReference> {
        let mut listings: Vec<ListingReference> = Vec::new();
        if max_results == 0 {
            return listings;
        }

        let mut seen: HashSet<String> = HashSet::new();
        let page_count = max_results.div_ceil(PAGE_SIZE);

        for page in 1..=page_count {
            let url = match page_url(search_url, page) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(error = %e, "unusable search URL; nothing to discover");
                    return listings;
                }
            };

            let html = match self.fetch_html(url.as_str(), self.search_timeout).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(page, url = %url, error = %e, "search page failed; skipping");
                    continue;
                }
            };

            let links = listing_links(&html, &url);
            if links.is_empty() {
                tracing::debug!(page, "search page has no listings; stopping");
                break;
            }

            for link in links {
                let Some(id) = listing_id_from_url(&link) else {
                    continue;
                };
                if !seen.insert(id.clone()) {
                    continue;
                }
                listings.push(ListingReference { id, url: link });
                if listings.len() >= max_results {
                    break;
                }
            }

            tracing::debug!(page, collected = listings.len(), "search page processed");
            if listings.len() >= max_results {
                break;
            }
        }

        tracing::info!(count = listings.len(), "listing discovery finished");
        listings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_appends_page() {
        let url = page_url("https://www.finn.no/mobility/search/car?registration_class=1", 2)
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://www.finn.no/mobility/search/car?registration_class=1&page=2"
        );
    }

    #[test]
    fn page_url_replaces_existing_page() {
        let url = page_url(
            "https://www.finn.no/mobility/search/car?page=7&make=0.744&page=9&sort=PRICE_ASC",
            3,
        )
        .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://www.finn.no/mobility/search/car?make=0.744&sort=PRICE_ASC&page=3"
        );
    }

    #[test]
    fn page_url_without_query() {
        let url = page_url("https://www.finn.no/mobility/search/car", 1).expect("valid url");
        assert_eq!(url.as_str(), "https://www.finn.no/mobility/search/car?page=1");
    }

    #[test]
    fn page_url_rejects_garbage() {
        let err = page_url("not a url", 1).unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidSearchUrl { .. }),
            "expected InvalidSearchUrl, got: {err:?}"
        );
    }

    #[test]
    fn page_url_rejects_non_http_scheme() {
        let err = page_url("ftp://www.finn.no/cars", 1).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidSearchUrl { .. }));
    }
}
