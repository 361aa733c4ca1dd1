use taxonet_core::config::NetworkConfig;
use taxonet_core::filter::FilterState;
use taxonet_core::graph::{TaxonNetwork, TaxonVertex, VisibilityFilter};
use taxonet_core::types::{EdgeId, Rank, TaxonId};

fn vertex(id: u32, freq: f64) -> TaxonVertex {
    TaxonVertex::new(TaxonId(id), format!("taxon_{id}"), Rank::Genus, freq)
}

/// Triangle: 1 -- 2 (r 0.8, p 0.01), 1 -- 3 (r -0.5, p 0.2),
/// 2 -- 3 (r 0.1, p 0.6). Frequencies 0.2 / 0.5 / 0.9.
fn triangle() -> TaxonNetwork {
    let mut network = TaxonNetwork::new();
    assert!(network.add_vertex(vertex(1, 0.2)));
    assert!(network.add_vertex(vertex(2, 0.5)));
    assert!(network.add_vertex(vertex(3, 0.9)));
    assert!(network.add_edge(TaxonId(1), TaxonId(2), 0.8, 0.01));
    assert!(network.add_edge(TaxonId(1), TaxonId(3), -0.5, 0.2));
    assert!(network.add_edge(TaxonId(2), TaxonId(3), 0.1, 0.6));
    network
}

fn visible_edge_ids(network: &TaxonNetwork) -> Vec<EdgeId> {
    network.visible_edges().iter().map(|e| e.id).collect()
}

fn visible_vertex_ids(network: &TaxonNetwork) -> Vec<u32> {
    network.visible_vertices().iter().map(|v| v.id.0).collect()
}

#[test]
fn full_range_shows_everything() {
    let mut network = triangle();
    VisibilityFilter::apply(&mut network, &FilterState::default(), &NetworkConfig::default());
    assert_eq!(visible_edge_ids(&network).len(), 3);
    assert_eq!(visible_vertex_ids(&network), vec![1, 2, 3]);
}

#[test]
fn vacuous_range_hides_everything() {
    let mut network = triangle();
    let mut filters = FilterState::default();
    // Out of domain on purpose: still valid input, just vacuous.
    filters.set_min_correlation(2.0);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());
    assert!(visible_edge_ids(&network).is_empty());
    assert!(visible_vertex_ids(&network).is_empty());
}

#[test]
fn inverted_range_hides_everything() {
    let mut network = triangle();
    let mut filters = FilterState::default();
    filters.set_min_correlation(0.5);
    filters.set_max_correlation(-0.5);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());
    assert!(visible_edge_ids(&network).is_empty());
}

#[test]
fn edge_pass_is_idempotent() {
    let mut network = triangle();
    let mut filters = FilterState::default();
    filters.set_min_correlation(0.0);
    filters.set_max_p_value(0.5);

    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());
    let first = visible_edge_ids(&network);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());
    let second = visible_edge_ids(&network);
    assert_eq!(first, second);
}

#[test]
fn significance_cull_cascades_to_vertices() {
    let mut network = triangle();
    let mut filters = FilterState::default();
    filters.set_max_p_value(0.05);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());

    // Only 1 -- 2 survives; vertex 3 lost every incident edge and must
    // vanish even though it was never directly flagged.
    assert_eq!(visible_edge_ids(&network).len(), 1);
    assert_eq!(visible_vertex_ids(&network), vec![1, 2]);
    assert!(!network.vertex(TaxonId(3)).expect("vertex 3").is_hub);
}

#[test]
fn frequency_cull_hides_incident_edges_not_the_vertex_flag() {
    let mut network = triangle();
    let mut filters = FilterState::default();
    filters.set_min_frequency(0.3);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());

    // Vertex 1 (freq 0.2) is out of range: both its edges disappear and
    // only 2 -- 3 stays.
    assert_eq!(visible_edge_ids(&network).len(), 1);
    let edge = network
        .edge_between(TaxonId(2), TaxonId(3))
        .expect("edge 2-3");
    assert!(!edge.is_hidden);
    assert_eq!(visible_vertex_ids(&network), vec![2, 3]);
}

#[test]
fn recompute_recovers_after_thresholds_relax() {
    let mut network = triangle();
    let mut filters = FilterState::default();
    filters.set_min_correlation(2.0);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());
    assert!(visible_edge_ids(&network).is_empty());

    filters.set_min_correlation(-1.0);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());
    assert_eq!(visible_edge_ids(&network).len(), 3);
    assert_eq!(visible_vertex_ids(&network), vec![1, 2, 3]);
}

#[test]
fn duplicate_edge_insertion_is_rejected_without_clobbering() {
    let mut network = triangle();
    assert!(!network.add_edge(TaxonId(1), TaxonId(2), -0.9, 0.99));
    // Reversed endpoints resolve to the same pair.
    assert!(!network.add_edge(TaxonId(2), TaxonId(1), -0.9, 0.99));

    let edge = network
        .edge_between(TaxonId(2), TaxonId(1))
        .expect("edge 1-2");
    assert_eq!(edge.correlation, 0.8);
    assert_eq!(edge.p_value, 0.01);
    assert_eq!(network.edge_count(), 3);
}

#[test]
fn self_loops_and_missing_endpoints_are_rejected() {
    let mut network = triangle();
    assert!(!network.add_edge(TaxonId(1), TaxonId(1), 0.5, 0.5));
    assert!(!network.add_edge(TaxonId(1), TaxonId(42), 0.5, 0.5));
    assert!(!network.add_vertex(vertex(1, 0.7)));
    assert_eq!(network.edge_count(), 3);
    assert_eq!(network.vertex_count(), 3);
}

#[test]
fn remove_vertex_cascades_over_incident_edges() {
    let mut network = triangle();
    assert!(network.remove_vertex(TaxonId(2)));
    assert_eq!(network.vertex_count(), 2);
    assert_eq!(network.edge_count(), 1);
    assert!(network.edge_between(TaxonId(1), TaxonId(2)).is_none());
    assert!(network.edge_between(TaxonId(1), TaxonId(3)).is_some());
    assert!(!network.remove_vertex(TaxonId(2)));

    // Every remaining edge endpoint still resolves to a vertex.
    for edge in network.edges() {
        assert!(network.vertex(edge.a).is_some());
        assert!(network.vertex(edge.b).is_some());
    }
}

#[test]
fn isolated_vertex_visibility_is_a_policy_decision() {
    let mut network = triangle();
    assert!(network.add_vertex(vertex(7, 0.4)));

    let filters = FilterState::default();
    let default_config = NetworkConfig::default();
    VisibilityFilter::apply(&mut network, &filters, &default_config);
    assert!(!visible_vertex_ids(&network).contains(&7));

    let show = NetworkConfig {
        show_isolated_vertices: true,
        ..NetworkConfig::default()
    };
    VisibilityFilter::apply(&mut network, &filters, &show);
    assert!(visible_vertex_ids(&network).contains(&7));

    // Out of frequency range: the policy no longer applies.
    let mut strict = FilterState::default();
    strict.set_min_frequency(0.5);
    VisibilityFilter::apply(&mut network, &strict, &show);
    assert!(!visible_vertex_ids(&network).contains(&7));
}

#[test]
fn adjacency_resolves_both_directions_to_one_edge() {
    let network = triangle();
    let forward = network.edge_between(TaxonId(1), TaxonId(3)).expect("edge");
    let backward = network.edge_between(TaxonId(3), TaxonId(1)).expect("edge");
    assert_eq!(forward.id, backward.id);

    let mut neighbors: Vec<u32> = network.neighbors(TaxonId(1)).map(|t| t.0).collect();
    neighbors.sort_unstable();
    assert_eq!(neighbors, vec![2, 3]);
    assert_eq!(network.incident_edge_ids(TaxonId(1)).len(), 2);
}

#[test]
fn selection_flag_survives_recomputes() {
    let mut network = triangle();
    network.vertex_mut(TaxonId(2)).expect("vertex 2").is_selected = true;

    let mut filters = FilterState::default();
    filters.set_max_p_value(0.05);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());

    // Filtering never touches the UI-origin selection flag.
    assert!(network.vertex(TaxonId(2)).expect("vertex 2").is_selected);
}

#[test]
fn hub_flag_tracks_visible_degree_above_the_mean() {
    // Star: center 1 joined to four leaves.
    let mut network = TaxonNetwork::new();
    for id in 1..=5 {
        assert!(network.add_vertex(vertex(id, 0.5)));
    }
    for leaf in 2..=5 {
        assert!(network.add_edge(TaxonId(1), TaxonId(leaf), 0.9, 0.001));
    }

    VisibilityFilter::apply(&mut network, &FilterState::default(), &NetworkConfig::default());
    let hubs: Vec<u32> = network.hubs().iter().map(|v| v.id.0).collect();
    assert_eq!(hubs, vec![1]);

    // Hiding the star's edges dissolves the hub.
    let mut filters = FilterState::default();
    filters.set_max_p_value(0.0001);
    VisibilityFilter::apply(&mut network, &filters, &NetworkConfig::default());
    assert!(network.hubs().is_empty());
}
