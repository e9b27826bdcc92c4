//! Shared data model, configuration and result aggregation for bilscan.

pub mod aggregate;
pub mod app_config;
pub mod config;
pub mod listing;
pub mod tree;

use thiserror::Error;

pub use aggregate::{
    aggregate, country_of, AggregateView, CountryCount, CountryFilter, DOMESTIC_COUNTRY,
    UNKNOWN_COUNTRY,
};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use listing::{Batch, EnrichedRecord, ListingReference, RegistryRecord};
pub use tree::{lookup, lookup_text, PathStep};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
