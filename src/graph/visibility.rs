//! Visibility recompute: threshold passes over edges and vertices.

use crate::config::NetworkConfig;
use crate::filter::FilterState;
use crate::graph::TaxonNetwork;

/// Recomputes edge and vertex visibility from the current thresholds.
///
/// Both passes are idempotent for a fixed [`FilterState`] and run in
/// O(V + E). The recompute is synchronous: callers never observe a
/// partially updated graph.
#[derive(Debug)]
pub struct VisibilityFilter;

impl VisibilityFilter {
    /// Run the full recompute.
    ///
    /// Pass order matters: edge thresholds first, then frequency-based
    /// vertex culling, which propagates onto incident edges without
    /// being overwritten afterwards. Vertex visibility itself is purely
    /// derived: a vertex is shown only while at least one incident edge
    /// is visible (or the isolated-vertex policy applies).
    pub fn apply(network: &mut TaxonNetwork, filters: &FilterState, config: &NetworkConfig) {
        Self::edge_pass(network, filters);
        Self::frequency_pass(network, filters);
        Self::derive_vertex_state(network, filters, config);
    }

    /// Hide every edge whose correlation falls outside the configured
    /// range or whose significance is too weak.
    fn edge_pass(network: &mut TaxonNetwork, filters: &FilterState) {
        let min_r = filters.min_correlation();
        let max_r = filters.max_correlation();
        let max_p = filters.max_p_value();
        for edge in network.edges_mut() {
            edge.is_hidden =
                edge.correlation < min_r || edge.correlation > max_r || edge.p_value > max_p;
        }
    }

    /// Hide all edges incident to vertices whose maximum relative
    /// frequency lies outside the configured range. The vertex object
    /// itself is not flagged here; its visibility is derived afterwards.
    fn frequency_pass(network: &mut TaxonNetwork, filters: &FilterState) {
        let min_f = filters.min_frequency();
        let max_f = filters.max_frequency();
        let culled: Vec<_> = network
            .vertices()
            .filter(|v| v.max_relative_frequency < min_f || v.max_relative_frequency > max_f)
            .map(|v| v.id)
            .collect();
        for id in culled {
            for edge_id in network.incident_edge_ids(id) {
                if let Some(edge) = network.edge_by_id_mut(edge_id) {
                    edge.is_hidden = true;
                }
            }
        }
    }

    /// Derive per-vertex hidden and hub flags from the edge visibility
    /// computed by the two passes.
    fn derive_vertex_state(
        network: &mut TaxonNetwork,
        filters: &FilterState,
        config: &NetworkConfig,
    ) {
        let ids: Vec<_> = network.vertices().map(|v| v.id).collect();
        let degrees: Vec<usize> = ids.iter().map(|&id| network.visible_degree(id)).collect();
        let total_edges: Vec<usize> = ids
            .iter()
            .map(|&id| network.incident_edge_ids(id).len())
            .collect();

        let vertex_count = ids.len();
        let mean_degree = if vertex_count == 0 {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / vertex_count as f64
        };
        let hub_threshold = config.hub_degree_factor * mean_degree;

        let min_f = filters.min_frequency();
        let max_f = filters.max_frequency();

        for (i, &id) in ids.iter().enumerate() {
            let degree = degrees[i];
            let isolated = total_edges[i] == 0;
            let Some(vertex) = network.vertex_mut(id) else {
                continue;
            };

            vertex.is_hidden = if degree > 0 {
                false
            } else if isolated {
                let in_range = vertex.max_relative_frequency >= min_f
                    && vertex.max_relative_frequency <= max_f;
                !(config.show_isolated_vertices && in_range)
            } else {
                // Had edges, all of them hidden: effectively absent.
                true
            };
            vertex.is_hub = degree > 0 && degree as f64 > hub_threshold;
        }
    }
}
