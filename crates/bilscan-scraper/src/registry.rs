//! HTTP client for the national vehicle registry lookup API.
//!
//! One GET per identifier, authenticated with an API-key header. The
//! response envelope is `{"kjoretoydataListe": [ <record>, ... ]}` and only
//! the first record is kept.

use std::time::Duration;

use bilscan_core::RegistryRecord;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::ScraperError;
use crate::identifier::{normalize_identifier, IdentifierKind};

const API_KEY_HEADER: &str = "SVV-Authorization";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "kjoretoydataListe", default)]
    records: Option<Vec<serde_json::Value>>,
}

/// Client for the registry's single-vehicle lookup endpoint.
///
/// Use [`RegistryClient::new`] with the production endpoint from config, or
/// point it at a mock server in tests.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl RegistryClient {
    /// Creates a new client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidRegistryUrl`] if `base_url` does not
    /// parse, or [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bilscan/0.1 (vehicle-registry-lookup)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| ScraperError::InvalidRegistryUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Looks up one vehicle by plate or chassis number.
    ///
    /// The identifier is normalized first and classified with
    /// [`IdentifierKind::classify`] to choose the query parameter. Returns
    /// `None` for a blank identifier, a network failure, a non-200 status or
    /// an empty result list; failures are logged, never returned.
    pub async fn lookup(&self, identifier: &str) -> Option<RegistryRecord> {
        let normalized = normalize_identifier(identifier)?;
        match self.try_lookup(&normalized).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                tracing::debug!(identifier = %normalized, "registry has no data for identifier");
                None
            }
            Err(e) => {
                tracing::warn!(identifier = %normalized, error = %e, "registry lookup failed");
                None
            }
        }
    }

    /// Builds the lookup URL with the query parameter matching the
    /// identifier's kind.
    fn lookup_url(&self, normalized: &str) -> Url {
        let kind = IdentifierKind::classify(normalized);
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(kind.query_param(), normalized);
        url
    }

    async fn try_lookup(&self, normalized: &str) -> Result<Option<RegistryRecord>, ScraperError> {
        let url = self.lookup_url(normalized);
        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, format!("Apikey {}", self.api_key))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: LookupResponse =
            serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("registry lookup for {normalized}"),
                source: e,
            })?;

        Ok(parsed
            .records
            .and_then(|records| records.into_iter().next())
            .map(RegistryRecord))
    }
}
