//! Common core types used across the network engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a taxon, as assigned by the taxonomy source.
///
/// Ordered so that canonical edge keys and unified taxon lists can be
/// sorted deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonId(pub u32);

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal numeric identifier for edges.
pub type EdgeId = u64;

/// Taxonomic level at which counts are aggregated for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Domain (NCBI "superkingdom").
    Domain,
    /// Kingdom.
    Kingdom,
    /// Phylum.
    Phylum,
    /// Class.
    Class,
    /// Order.
    Order,
    /// Family.
    Family,
    /// Genus.
    Genus,
    /// Species.
    Species,
    /// Unranked clades and every level not listed above.
    NoRank,
}

impl Rank {
    /// All named ranks, coarsest first. `NoRank` is excluded since it is
    /// never a valid aggregation level.
    pub const NAMED: [Rank; 8] = [
        Rank::Domain,
        Rank::Kingdom,
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
        Rank::Species,
    ];
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "domain" | "superkingdom" => Ok(Rank::Domain),
            "kingdom" => Ok(Rank::Kingdom),
            "phylum" => Ok(Rank::Phylum),
            "class" => Ok(Rank::Class),
            "order" => Ok(Rank::Order),
            "family" => Ok(Rank::Family),
            "genus" => Ok(Rank::Genus),
            "species" => Ok(Rank::Species),
            "" | "no rank" | "norank" | "clade" => Ok(Rank::NoRank),
            other => Err(format!("unrecognized rank '{other}'")),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Domain => "domain",
            Rank::Kingdom => "kingdom",
            Rank::Phylum => "phylum",
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
            Rank::NoRank => "no rank",
        };
        f.write_str(s)
    }
}
