//! HTTP client for the classifieds site: search result pages and listing
//! detail pages.

mod detail;
mod discover;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;

use crate::error::ScraperError;

pub use discover::page_url;

/// Number of listings the site shows per search results page.
pub const PAGE_SIZE: usize = 50;

/// One connection-reusing client shared by discovery and every detail
/// fetch of a scan.
///
/// Each fetch is a single attempt bounded by its own timeout; failures are
/// logged and degraded by the caller, never retried.
#[derive(Clone)]
pub struct SiteClient {
    client: Client,
    search_timeout: Duration,
    detail_timeout: Duration,
}

impl SiteClient {
    /// Creates a `SiteClient` sending the given `User-Agent` and
    /// `Accept-Language` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidHeader`] if `accept_language` is not a
    /// valid header value, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        user_agent: &str,
        accept_language: &str,
        search_timeout_secs: u64,
        detail_timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(accept_language)?);

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            search_timeout: Duration::from_secs(search_timeout_secs),
            detail_timeout: Duration::from_secs(detail_timeout_secs),
        })
    }

    /// GETs `url` and returns the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or timeout.
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx status.
    async fn fetch_html(&self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}
