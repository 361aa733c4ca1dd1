//! Live threshold state driving the visibility recompute.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Rank;

/// Current threshold values and aggregation rank.
///
/// The single source of truth consulted by the filtering pass. Setters
/// accept any value: an inverted or out-of-domain range is not an error,
/// it simply yields an empty visible set downstream. Every mutation
/// bumps `revision`, the change-notification contract: hosts compare
/// revisions instead of registering listeners, and call
/// [`crate::session::AnalysisSession::apply_filters`] when it moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterState {
    min_correlation: f64,
    max_correlation: f64,
    max_p_value: f64,
    min_frequency: f64,
    max_frequency: f64,
    rank: Rank,
    #[serde(skip)]
    revision: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_correlation: -1.0,
            max_correlation: 1.0,
            max_p_value: 1.0,
            min_frequency: 0.0,
            max_frequency: 1.0,
            rank: Rank::Genus,
            revision: 0,
        }
    }
}

impl FilterState {
    /// Lower correlation bound; edges below it are hidden.
    pub fn min_correlation(&self) -> f64 {
        self.min_correlation
    }

    /// Upper correlation bound; edges above it are hidden.
    pub fn max_correlation(&self) -> f64 {
        self.max_correlation
    }

    /// Significance ceiling; edges with a larger p-value are hidden.
    pub fn max_p_value(&self) -> f64 {
        self.max_p_value
    }

    /// Lower relative-frequency bound for vertices.
    pub fn min_frequency(&self) -> f64 {
        self.min_frequency
    }

    /// Upper relative-frequency bound for vertices.
    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    /// Aggregation rank for the next rebuild.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Monotonic counter bumped by every setter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Set the lower correlation bound.
    pub fn set_min_correlation(&mut self, value: f64) {
        self.check_domain("min_correlation", value, -1.0, 1.0);
        self.min_correlation = value;
        self.revision += 1;
    }

    /// Set the upper correlation bound.
    pub fn set_max_correlation(&mut self, value: f64) {
        self.check_domain("max_correlation", value, -1.0, 1.0);
        self.max_correlation = value;
        self.revision += 1;
    }

    /// Set the significance ceiling.
    pub fn set_max_p_value(&mut self, value: f64) {
        self.check_domain("max_p_value", value, 0.0, 1.0);
        self.max_p_value = value;
        self.revision += 1;
    }

    /// Set the lower relative-frequency bound.
    pub fn set_min_frequency(&mut self, value: f64) {
        self.check_domain("min_frequency", value, 0.0, 1.0);
        self.min_frequency = value;
        self.revision += 1;
    }

    /// Set the upper relative-frequency bound.
    pub fn set_max_frequency(&mut self, value: f64) {
        self.check_domain("max_frequency", value, 0.0, 1.0);
        self.max_frequency = value;
        self.revision += 1;
    }

    /// Change the aggregation rank. The caller must rebuild afterwards;
    /// a visibility recompute alone cannot reflect a rank change.
    pub fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
        self.revision += 1;
    }

    fn check_domain(&self, field: &str, value: f64, lo: f64, hi: f64) {
        if !(lo..=hi).contains(&value) {
            debug!(field, value, "threshold outside its natural domain, range is vacuous");
        }
    }
}
