#![forbid(unsafe_code)]
#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms
)]

//! # taxonet-core
//!
//! Core library for the taxon correlation network engine:
//! - hierarchical count roll-up over a taxonomy tree
//! - cross-sample Pearson correlation and significance matrices
//! - a sparse undirected network whose vertex/edge visibility is
//!   recomputed in one pass from live thresholds
//!
//! This crate is designed to be deterministic, testable, and free of
//! presentation logic. Parsers and rendering are host concerns.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod filter;
pub mod graph;
/// Persistence of session preferences.
pub mod persistence;
pub mod sample;
pub mod session;
pub mod taxonomy;
pub mod types;

pub use analysis::{CorrelationEngine, CorrelationResult};
pub use config::NetworkConfig;
pub use errors::NetworkError;
pub use filter::FilterState;
pub use graph::TaxonNetwork;
pub use sample::{Sample, SampleStore};
pub use session::AnalysisSession;
pub use taxonomy::TaxonHierarchy;
pub use types::{Rank, TaxonId};
