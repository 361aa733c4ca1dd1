//! Error types for taxonet-core.

use thiserror::Error;

use crate::types::TaxonId;

/// Top-level error type for network engine operations.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Taxonomy construction failed: missing parent, duplicate id,
    /// missing or ambiguous root, or a cycle. No partial tree is returned.
    #[error("malformed hierarchy: {0}")]
    MalformedHierarchy(String),

    /// Lookup of a taxon id that is not present in the hierarchy.
    /// Recoverable: typically surfaced as a per-file load failure.
    #[error("taxon id {0} was not found in the hierarchy")]
    UnknownTaxon(TaxonId),

    /// Correlation requires at least 3 samples.
    #[error("correlation needs at least 3 samples, {selected} selected")]
    InsufficientSamples {
        /// Number of samples that were selected for analysis.
        selected: usize,
    },

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for network engine operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
