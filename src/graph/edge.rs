//! Correlation edge definition.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, TaxonId};

/// Undirected edge carrying one statistical relationship between two
/// taxa. Endpoints are stored canonically with `a < b`; both directions
/// resolve to the same edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonEdge {
    /// Internal edge identifier.
    pub id: EdgeId,
    /// Smaller endpoint taxon id.
    pub a: TaxonId,
    /// Larger endpoint taxon id.
    pub b: TaxonId,
    /// Pearson correlation between the endpoints, in [-1, 1].
    pub correlation: f64,
    /// Two-tailed significance of the correlation, in [0, 1].
    pub p_value: f64,
    /// Set by the visibility recompute.
    pub is_hidden: bool,
}
