//! Network-level metrics and read-only edge queries.

use crate::graph::{TaxonEdge, TaxonNetwork};

/// Summary metrics for health-checking the network after a recompute.
#[derive(Debug, Default)]
pub struct NetworkMetrics {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of edges.
    pub edge_count: usize,
    /// Vertices visible after the last recompute.
    pub visible_vertices: usize,
    /// Edges visible after the last recompute.
    pub visible_edges: usize,
    /// Mean visible degree over all vertices.
    pub avg_visible_degree: f64,
    /// Vertices currently flagged as hubs.
    pub hub_count: usize,
}

impl NetworkMetrics {
    /// Compute metrics for the given network.
    pub fn compute(network: &TaxonNetwork) -> Self {
        let vertex_count = network.vertex_count();
        let visible_edges = network.edges().filter(|e| !e.is_hidden).count();
        let avg_visible_degree = if vertex_count > 0 {
            (2 * visible_edges) as f64 / vertex_count as f64
        } else {
            0.0
        };
        Self {
            vertex_count,
            edge_count: network.edge_count(),
            visible_vertices: network.vertices().filter(|v| !v.is_hidden).count(),
            visible_edges,
            avg_visible_degree,
            hub_count: network.vertices().filter(|v| v.is_hub).count(),
        }
    }
}

/// Edge with the strongest positive correlation over the full edge set.
///
/// A query over the already-built network; no part of the analysis is
/// recomputed. Ties break towards the smaller endpoint pair so the
/// answer is deterministic.
pub fn strongest_positive_edge(network: &TaxonNetwork) -> Option<&TaxonEdge> {
    extreme_edge(network, |best, candidate| candidate > best)
}

/// Edge with the strongest negative correlation over the full edge set.
pub fn strongest_negative_edge(network: &TaxonNetwork) -> Option<&TaxonEdge> {
    extreme_edge(network, |best, candidate| candidate < best)
}

fn extreme_edge(
    network: &TaxonNetwork,
    better: impl Fn(f64, f64) -> bool,
) -> Option<&TaxonEdge> {
    let mut best: Option<&TaxonEdge> = None;
    for edge in network.edges() {
        best = match best {
            None => Some(edge),
            Some(current) => {
                if better(current.correlation, edge.correlation)
                    || (edge.correlation == current.correlation
                        && (edge.a, edge.b) < (current.a, current.b))
                {
                    Some(edge)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}
