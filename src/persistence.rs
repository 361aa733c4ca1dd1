//! Persistence layer for session preferences.
//! Saves/loads: metadata, filter state, and the sample store.
//!
//! The core performs no I/O elsewhere; these entry points exist so a
//! host can park thresholds and loaded samples between runs.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::filter::FilterState;
use crate::sample::SampleStore;

/// Metadata stored with a saved session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Version of the core library that wrote the session.
    pub version: String,
    /// ISO 8601 timestamp of creation.
    pub created_at: String,
    /// Presentation policies in effect.
    pub config: NetworkConfig,
}

impl SessionMetadata {
    /// Create new metadata with current version and timestamp.
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
        }
    }
}

/// Save filter state and samples to the specified directory.
pub fn save_session(
    session_dir: &Path,
    metadata: &SessionMetadata,
    filters: &FilterState,
    samples: &SampleStore,
) -> Result<()> {
    std::fs::create_dir_all(session_dir)?;

    // 1. Metadata (JSON)
    let meta_path = session_dir.join("metadata.json");
    let meta_file = File::create(&meta_path).context("Failed to create metadata file")?;
    serde_json::to_writer_pretty(meta_file, metadata)?;

    // 2. Filter state (JSON)
    let filters_path = session_dir.join("filters.json");
    let filters_file = File::create(&filters_path).context("Failed to create filters file")?;
    serde_json::to_writer_pretty(filters_file, filters)?;

    // 3. Sample store (bincode)
    let samples_path = session_dir.join("samples.bin");
    let samples_file = File::create(&samples_path).context("Failed to create samples file")?;
    let mut samples_writer = BufWriter::new(samples_file);
    bincode::serialize_into(&mut samples_writer, samples)?;

    Ok(())
}

/// Load a previously saved session from the specified directory.
pub fn load_session(session_dir: &Path) -> Result<(SessionMetadata, FilterState, SampleStore)> {
    // 1. Metadata
    let meta_path = session_dir.join("metadata.json");
    let meta_file = File::open(&meta_path).context("Failed to open metadata file")?;
    let metadata: SessionMetadata = serde_json::from_reader(meta_file)?;

    // 2. Filter state
    let filters_path = session_dir.join("filters.json");
    let filters_file = File::open(&filters_path).context("Failed to open filters file")?;
    let filters: FilterState = serde_json::from_reader(filters_file)?;

    // 3. Sample store
    let samples_path = session_dir.join("samples.bin");
    let samples_bytes = std::fs::read(&samples_path).context("Failed to read samples file")?;
    let samples: SampleStore = bincode::deserialize(&samples_bytes)?;

    Ok((metadata, filters, samples))
}
