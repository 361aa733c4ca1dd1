//! Taxon vertex definition.

use serde::{Deserialize, Serialize};

use crate::types::{Rank, TaxonId};

/// A vertex of the correlation network, wrapping one taxon of the
/// unified list.
///
/// Name and rank are copied out of the hierarchy node at build time so
/// the network carries no borrowed tree references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonVertex {
    /// Taxon this vertex represents.
    pub id: TaxonId,
    /// Scientific name, copied from the hierarchy.
    pub name: String,
    /// Rank of the taxon, copied from the hierarchy.
    pub rank: Rank,
    /// Maximum over samples of this taxon's relative frequency.
    pub max_relative_frequency: f64,
    /// Derived by the visibility recompute: true while the vertex has no
    /// visible incident edge (and the isolated-vertex policy does not
    /// apply). Never set directly by the frequency pass.
    pub is_hidden: bool,
    /// Derived display emphasis: visible degree notably above the mean.
    pub is_hub: bool,
    /// UI-origin selection flag; stored for info display, never
    /// consulted by filtering.
    pub is_selected: bool,
}

impl TaxonVertex {
    /// Create a vertex, initially visible and unselected.
    pub fn new(id: TaxonId, name: String, rank: Rank, max_relative_frequency: f64) -> Self {
        Self {
            id,
            name,
            rank,
            max_relative_frequency,
            is_hidden: false,
            is_hub: false,
            is_selected: false,
        }
    }
}
