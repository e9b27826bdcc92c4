use thiserror::Error;

/// Failures inside a single fetch. Pipeline stages log these and degrade the
/// affected page or record; they never reach the caller of a stage.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid search URL \"{url}\": {reason}")]
    InvalidSearchUrl { url: String, reason: String },

    #[error("invalid registry URL \"{url}\": {reason}")]
    InvalidRegistryUrl { url: String, reason: String },
}
