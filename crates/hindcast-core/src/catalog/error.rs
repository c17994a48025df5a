//! Configuration errors raised while turning user input into catalog values.

use thiserror::Error;

/// Raised before any worker starts; the whole run aborts with a usage error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown region '{0}' (see --help for the list of regions)")]
    UnknownRegion(String),
    #[error("unknown feature '{0}' (see --help for the list of features)")]
    UnknownFeature(String),
    #[error("invalid date '{0}': expected MM-YYYY")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    EmptyRange { start: String, end: String },
}
