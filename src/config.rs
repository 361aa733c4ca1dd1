//! Presentation-policy configuration for the taxon network.

use serde::{Deserialize, Serialize};

/// Policies consulted by the visibility recompute.
///
/// These are presentation decisions, not statistical thresholds; the
/// statistical thresholds live in [`crate::filter::FilterState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// A vertex is flagged a hub when its visible degree exceeds this
    /// factor times the mean visible degree.
    pub hub_degree_factor: f64,
    /// Whether a vertex without any incident edges is shown as a
    /// floating node (provided its frequency is in range) or suppressed.
    pub show_isolated_vertices: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hub_degree_factor: 2.0,
            show_isolated_vertices: false,
        }
    }
}
