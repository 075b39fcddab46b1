//! Error types for benchmark loading and exclusion handling
//!
//! Only two conditions are fatal: an unreadable or malformed benchmark
//! document, and an unreadable exclusion list. Lookup misses are not errors.

use thiserror::Error;

use crate::benchmark::{DocumentLoadError, ExclusionSourceError};

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while preparing a tailoring plan
#[derive(Debug, Error)]
pub enum Error {
    /// The benchmark document could not be loaded
    #[error(transparent)]
    Document(#[from] DocumentLoadError),

    /// The exclusion list could not be loaded
    #[error(transparent)]
    Exclusions(#[from] ExclusionSourceError),
}
