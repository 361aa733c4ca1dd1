//! Sparse undirected taxon network: vertices, correlation edges,
//! construction, visibility filtering, and metrics.

use std::collections::HashMap;

use crate::types::{EdgeId, TaxonId};

pub mod builder;
pub mod edge;
pub mod metrics;
pub mod vertex;
pub mod visibility;

pub use builder::NetworkBuilder;
pub use edge::TaxonEdge;
pub use metrics::NetworkMetrics;
pub use vertex::TaxonVertex;
pub use visibility::VisibilityFilter;

/// Canonical unordered-pair key: smaller taxon id first.
fn pair_key(a: TaxonId, b: TaxonId) -> (TaxonId, TaxonId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Sparse undirected graph of taxon vertices and correlation edges.
///
/// Owns all vertices and edges. Adjacency maps each vertex to its
/// neighbors' edge ids; a reverse pair index gives O(1) edge lookup by
/// endpoint ids during filtering. At most one edge exists per unordered
/// pair, mirroring the one-statistical-relationship-per-pair semantics.
#[derive(Debug, Default)]
pub struct TaxonNetwork {
    vertices: HashMap<TaxonId, TaxonVertex>,
    adjacency: HashMap<TaxonId, HashMap<TaxonId, EdgeId>>,
    edges: HashMap<EdgeId, TaxonEdge>,
    pair_index: HashMap<(TaxonId, TaxonId), EdgeId>,
    next_edge_id: EdgeId,
}

impl TaxonNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex. Returns false (and leaves the graph untouched)
    /// when a vertex with the same taxon id already exists.
    pub fn add_vertex(&mut self, vertex: TaxonVertex) -> bool {
        if self.vertices.contains_key(&vertex.id) {
            return false;
        }
        self.adjacency.insert(vertex.id, HashMap::new());
        self.vertices.insert(vertex.id, vertex);
        true
    }

    /// Insert the edge for an unordered pair. Returns false on a
    /// self-loop, a missing endpoint, or a pair that already has an
    /// edge; the existing edge is never overwritten.
    pub fn add_edge(&mut self, a: TaxonId, b: TaxonId, correlation: f64, p_value: f64) -> bool {
        if a == b || !self.vertices.contains_key(&a) || !self.vertices.contains_key(&b) {
            return false;
        }
        let key = pair_key(a, b);
        if self.pair_index.contains_key(&key) {
            return false;
        }

        let id = self.next_edge_id;
        self.next_edge_id += 1;
        self.edges.insert(
            id,
            TaxonEdge {
                id,
                a: key.0,
                b: key.1,
                correlation,
                p_value,
                is_hidden: false,
            },
        );
        self.pair_index.insert(key, id);
        self.adjacency.entry(a).or_default().insert(b, id);
        self.adjacency.entry(b).or_default().insert(a, id);
        true
    }

    /// Remove an edge, unlinking both adjacency directions and the pair
    /// index. Returns false when the id is unknown.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.edges.remove(&id) else {
            return false;
        };
        self.pair_index.remove(&pair_key(edge.a, edge.b));
        if let Some(adj) = self.adjacency.get_mut(&edge.a) {
            adj.remove(&edge.b);
        }
        if let Some(adj) = self.adjacency.get_mut(&edge.b) {
            adj.remove(&edge.a);
        }
        true
    }

    /// Remove a vertex, cascading over its incident edges first so every
    /// remaining edge endpoint stays present in the vertex set.
    pub fn remove_vertex(&mut self, id: TaxonId) -> bool {
        if !self.vertices.contains_key(&id) {
            return false;
        }
        for edge_id in self.incident_edge_ids(id) {
            self.remove_edge(edge_id);
        }
        self.adjacency.remove(&id);
        self.vertices.remove(&id);
        true
    }

    /// The edge between two taxa, if any; symmetric in its arguments.
    pub fn edge_between(&self, a: TaxonId, b: TaxonId) -> Option<&TaxonEdge> {
        let id = self.pair_index.get(&pair_key(a, b))?;
        self.edges.get(id)
    }

    /// Vertex lookup by taxon id.
    pub fn vertex(&self, id: TaxonId) -> Option<&TaxonVertex> {
        self.vertices.get(&id)
    }

    /// Mutable vertex lookup, e.g. for UI selection flags.
    pub fn vertex_mut(&mut self, id: TaxonId) -> Option<&mut TaxonVertex> {
        self.vertices.get_mut(&id)
    }

    /// Neighbor taxon ids of a vertex.
    pub fn neighbors(&self, id: TaxonId) -> impl Iterator<Item = TaxonId> + '_ {
        self.adjacency.get(&id).into_iter().flat_map(|adj| adj.keys().copied())
    }

    /// Ids of all edges incident to a vertex.
    pub fn incident_edge_ids(&self, id: TaxonId) -> Vec<EdgeId> {
        self.adjacency
            .get(&id)
            .map(|adj| adj.values().copied().collect())
            .unwrap_or_default()
    }

    /// Edges incident to a vertex.
    pub fn incident_edges(&self, id: TaxonId) -> impl Iterator<Item = &TaxonEdge> {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|adj| adj.values())
            .filter_map(|eid| self.edges.get(eid))
    }

    /// Number of incident edges currently visible.
    pub fn visible_degree(&self, id: TaxonId) -> usize {
        self.incident_edges(id).filter(|e| !e.is_hidden).count()
    }

    /// All vertices, unspecified order.
    pub fn vertices(&self) -> impl Iterator<Item = &TaxonVertex> {
        self.vertices.values()
    }

    /// All edges, unspecified order.
    pub fn edges(&self) -> impl Iterator<Item = &TaxonEdge> {
        self.edges.values()
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut TaxonEdge> {
        self.edges.values_mut()
    }

    pub(crate) fn edge_by_id_mut(&mut self, id: EdgeId) -> Option<&mut TaxonEdge> {
        self.edges.get_mut(&id)
    }

    /// Total vertex count, visible or not.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total edge count, visible or not.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertices visible after the last recompute, ascending by taxon id.
    pub fn visible_vertices(&self) -> Vec<&TaxonVertex> {
        let mut out: Vec<_> = self.vertices.values().filter(|v| !v.is_hidden).collect();
        out.sort_by_key(|v| v.id);
        out
    }

    /// Edges visible after the last recompute, ascending by endpoint pair.
    pub fn visible_edges(&self) -> Vec<&TaxonEdge> {
        let mut out: Vec<_> = self.edges.values().filter(|e| !e.is_hidden).collect();
        out.sort_by_key(|e| (e.a, e.b));
        out
    }

    /// Vertices flagged as hubs after the last recompute, ascending by
    /// taxon id.
    pub fn hubs(&self) -> Vec<&TaxonVertex> {
        let mut out: Vec<_> = self.vertices.values().filter(|v| v.is_hub).collect();
        out.sort_by_key(|v| v.id);
        out
    }
}
