//! Listing discovery, detail-page enrichment and registry correlation for
//! vehicle classifieds.

pub mod error;
pub mod identifier;
pub mod parse;
pub mod pipeline;
pub mod pool;
pub mod registry;
pub mod site;

pub use error::ScraperError;
pub use identifier::{normalize_identifier, IdentifierKind};
pub use pipeline::{correlatable, Scanner};
pub use registry::RegistryClient;
pub use site::{SiteClient, PAGE_SIZE};
