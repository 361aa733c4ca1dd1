use std::sync::Arc;

use taxonet_core::errors::NetworkError;
use taxonet_core::persistence;
use taxonet_core::sample::{Sample, SampleId};
use taxonet_core::taxonomy::{TaxonHierarchy, TaxonRecord};
use taxonet_core::types::{Rank, TaxonId};
use taxonet_core::AnalysisSession;

fn genus_tree() -> Arc<TaxonHierarchy> {
    Arc::new(
        TaxonHierarchy::build(vec![
            TaxonRecord::new(1, "root", Rank::Domain, None),
            TaxonRecord::new(10, "genus_a", Rank::Genus, Some(1)),
            TaxonRecord::new(11, "a_one", Rank::Species, Some(10)),
            TaxonRecord::new(20, "genus_b", Rank::Genus, Some(1)),
            TaxonRecord::new(21, "b_one", Rank::Species, Some(20)),
            TaxonRecord::new(30, "genus_c", Rank::Genus, Some(1)),
            TaxonRecord::new(31, "c_one", Rank::Species, Some(30)),
        ])
        .expect("valid tree"),
    )
}

fn sample(name: &str, counts: &[(u32, u64)]) -> Sample {
    let mut s = Sample::new(name);
    for &(id, count) in counts {
        s.counts.insert(TaxonId(id), count);
    }
    s
}

fn loaded_session() -> (AnalysisSession, Vec<SampleId>) {
    let mut session = AnalysisSession::new(genus_tree());
    let ids = vec![
        session.samples_mut().add(sample("s1", &[(11, 1), (21, 2), (31, 3)])),
        session.samples_mut().add(sample("s2", &[(11, 2), (21, 4), (31, 2)])),
        session.samples_mut().add(sample("s3", &[(11, 3), (21, 6), (31, 1)])),
    ];
    (session, ids)
}

#[test]
fn failed_rebuild_leaves_prior_state_untouched() {
    let (mut session, ids) = loaded_session();
    assert_eq!(session.hierarchy().len(), 7);
    session.rebuild().expect("three samples suffice");

    let before_vertices = session.network().expect("network").vertex_count();
    let before_edges = session.network().expect("network").edge_count();

    // Deselect one sample: 2 remaining is below the analysis floor.
    assert!(session.samples_mut().set_selected(ids[0], false));
    let err = session.rebuild().unwrap_err();
    assert!(
        matches!(err, NetworkError::InsufficientSamples { selected: 2 }),
        "{err}"
    );

    // The previously built network and result are still there, unchanged.
    let network = session.network().expect("prior network kept");
    assert_eq!(network.vertex_count(), before_vertices);
    assert_eq!(network.edge_count(), before_edges);
    assert_eq!(session.result().expect("prior result kept").sample_count, 3);
}

#[test]
fn no_network_without_a_successful_rebuild() {
    let mut session = AnalysisSession::new(genus_tree());
    session.samples_mut().add(sample("s1", &[(11, 1)]));
    session.samples_mut().add(sample("s2", &[(11, 2)]));

    assert!(session.rebuild().is_err());
    assert!(session.network().is_none());
    assert!(session.result().is_none());
    assert!(!session.apply_filters());
}

#[test]
fn filter_mutation_changes_visibility_without_rebuilding() {
    let (mut session, _) = loaded_session();
    session.rebuild().expect("rebuild");

    let all_visible = session.network().expect("network").visible_edges().len();
    assert_eq!(all_visible, 3);

    // Keep only strong positive correlations.
    session.filters_mut().set_min_correlation(0.9);
    assert!(session.apply_filters());
    let strong_only = session.network().expect("network").visible_edges().len();
    assert!(strong_only < all_visible);

    // Same revision again: nothing to do.
    assert!(!session.apply_filters());

    // The engine output was not recomputed by filtering.
    assert_eq!(session.result().expect("result").sample_count, 3);
}

#[test]
fn rank_change_rebuilds_at_the_new_level() {
    let (mut session, _) = loaded_session();
    session.rebuild().expect("rebuild");
    assert_eq!(
        session.result().expect("result").taxa,
        vec![TaxonId(10), TaxonId(20), TaxonId(30)]
    );

    session.filters_mut().set_rank(Rank::Species);
    session.rebuild().expect("rebuild at species level");
    assert_eq!(
        session.result().expect("result").taxa,
        vec![TaxonId(11), TaxonId(21), TaxonId(31)]
    );
}

#[test]
fn session_preferences_round_trip() {
    let (mut session, ids) = loaded_session();
    session.filters_mut().set_min_correlation(0.25);
    session.filters_mut().set_max_p_value(0.05);
    session.filters_mut().set_rank(Rank::Family);
    session.samples_mut().set_selected(ids[1], false);

    let dir = std::path::Path::new("tests/session_roundtrip");
    let metadata = persistence::SessionMetadata::new(session.config());
    persistence::save_session(dir, &metadata, session.filters(), session.samples())
        .expect("save");

    let (loaded_meta, filters, samples) = persistence::load_session(dir).expect("load");
    assert_eq!(loaded_meta.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(filters.min_correlation(), 0.25);
    assert_eq!(filters.max_p_value(), 0.05);
    assert_eq!(filters.rank(), Rank::Family);
    assert_eq!(samples.len(), 3);
    assert_eq!(samples.selected_count(), 2);

    // Cleanup
    std::fs::remove_dir_all(dir).expect("cleanup");
}
