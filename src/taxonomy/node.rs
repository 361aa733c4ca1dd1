//! Taxon node definition.

use serde::{Deserialize, Serialize};

use crate::types::{Rank, TaxonId};

/// A single node of the taxonomic hierarchy.
///
/// The hierarchy owns every node in an id-keyed map; `parent` and
/// `children` are id back-references into that map, never pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonNode {
    /// Unique taxon identifier.
    pub id: TaxonId,
    /// Scientific name of the taxon.
    pub name: String,
    /// Taxonomic level of this node.
    pub rank: Rank,
    /// Parent taxon, `None` for the root.
    pub parent: Option<TaxonId>,
    /// Direct children, in input order.
    pub children: Vec<TaxonId>,
}

/// One input row for hierarchy construction, before linking.
///
/// A `parent` equal to the record's own id is normalized to `None`
/// (the NCBI dump encodes its root as its own parent).
#[derive(Debug, Clone)]
pub struct TaxonRecord {
    /// Unique taxon identifier.
    pub id: TaxonId,
    /// Scientific name of the taxon.
    pub name: String,
    /// Taxonomic level.
    pub rank: Rank,
    /// Declared parent id, `None` for the root.
    pub parent: Option<TaxonId>,
}

impl TaxonRecord {
    /// Convenience constructor.
    pub fn new(id: u32, name: impl Into<String>, rank: Rank, parent: Option<u32>) -> Self {
        Self {
            id: TaxonId(id),
            name: name.into(),
            rank,
            parent: parent.map(TaxonId),
        }
    }
}
