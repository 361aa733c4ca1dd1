//! Network construction from correlation engine output.

use crate::analysis::CorrelationResult;
use crate::errors::Result;
use crate::graph::{TaxonNetwork, TaxonVertex};
use crate::taxonomy::TaxonHierarchy;

/// Builds a [`TaxonNetwork`] from one analysis result.
#[derive(Debug)]
pub struct NetworkBuilder;

impl NetworkBuilder {
    /// One vertex per unified taxon, one edge per unordered pair with
    /// the matching matrix cells. The returned network has every edge
    /// visible; callers run the visibility recompute right after.
    pub fn build(result: &CorrelationResult, hierarchy: &TaxonHierarchy) -> Result<TaxonNetwork> {
        let mut network = TaxonNetwork::new();

        for (i, &taxon) in result.taxa.iter().enumerate() {
            let node = hierarchy.lookup(taxon)?;
            let vertex = TaxonVertex::new(
                taxon,
                node.name.clone(),
                node.rank,
                result.max_relative_frequency[i],
            );
            let inserted = network.add_vertex(vertex);
            debug_assert!(inserted, "unified taxon list contains duplicates");
        }

        for i in 0..result.taxa.len() {
            for j in (i + 1)..result.taxa.len() {
                let inserted = network.add_edge(
                    result.taxa[i],
                    result.taxa[j],
                    result.correlation.get(i, j),
                    result.p_values.get(i, j),
                );
                debug_assert!(inserted, "pair ({i}, {j}) built twice");
            }
        }

        Ok(network)
    }
}
