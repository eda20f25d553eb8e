//! Merge window scenarios through the full engine.
//!
//! Hits are placed with explicit `y` coordinates so the cluster distances
//! are exact; cells are kept far apart so every tower seeds its own cluster.

use lumi_cluster::{ClusterConfig, ClusterEngine, MergeConfig};
use lumi_core::traits::ClusterReconstructor;
use lumi_core::types::{EventId, Hit};
use lumi_tests::helpers::*;

fn two_clusters(y1: f64, e1: f64, y2: f64, e2: f64) -> Vec<Hit> {
    vec![hit_at_y(0, 5, 2, e1, y1), hit_at_y(3, 60, 2, e2, y2)]
}

#[test]
fn close_pair_merges_into_energy_sum() {
    for (e1, e2) in [(1.0, 1.0), (10.0, 0.5), (0.25, 8.0), (3.0, 3.0)] {
        let hits = two_clusters(80.0, e1, 82.0, e2);
        let reco = calorimeter_engine(true)
            .reconstruct(EventId(0), &hits)
            .unwrap();
        assert_eq!(reco.clusters.len(), 1, "energies {e1} and {e2}");
        assert_eq!(reco.clusters[0].energy, e1 + e2);
        assert_eq!(reco.clusters[0].towers.len(), 2);
        check_partition(&reco).unwrap();
    }
}

#[test]
fn distant_pair_never_merges() {
    for (e1, e2) in [(1.0, 1.0), (1000.0, 0.001), (0.001, 1000.0)] {
        let hits = two_clusters(80.0, e1, 120.0, e2);
        let reco = calorimeter_engine(true)
            .reconstruct(EventId(0), &hits)
            .unwrap();
        assert_eq!(reco.clusters.len(), 2, "energies {e1} and {e2}");
    }
}

#[test]
fn faint_satellite_in_ratio_window_merges() {
    // 20 mm apart: accepted ratio below 0.1 - 0.1 = 0.0, nothing merges.
    let hits = two_clusters(80.0, 100.0, 100.0, 0.5);
    assert_eq!(
        calorimeter_engine(true)
            .reconstruct(EventId(0), &hits)
            .unwrap()
            .clusters
            .len(),
        2
    );

    // 12 mm apart: accepted ratio below 0.04; 1/100 qualifies.
    let hits = two_clusters(80.0, 100.0, 92.0, 1.0);
    let reco = calorimeter_engine(true)
        .reconstruct(EventId(0), &hits)
        .unwrap();
    assert_eq!(reco.clusters.len(), 1);
    assert_eq!(reco.clusters[0].energy, 101.0);
}

#[test]
fn comparable_clusters_in_ratio_window_stay_apart() {
    let hits = two_clusters(80.0, 10.0, 92.0, 9.0);
    let reco = calorimeter_engine(true)
        .reconstruct(EventId(0), &hits)
        .unwrap();
    assert_eq!(reco.clusters.len(), 2);
}

#[test]
fn merged_position_is_recomputed_from_all_hits() {
    let hits = two_clusters(80.0, 2.0, 84.0, 2.0);
    let engine = ClusterEngine::with_config(ClusterConfig::tracker()).unwrap();
    let reco = engine.reconstruct(EventId(0), &hits).unwrap();
    assert_eq!(reco.clusters.len(), 1);
    assert!((reco.clusters[0].y - 82.0).abs() < 1e-12);
    assert_eq!(reco.clusters[0].n_pads, 2);
}

#[test]
fn merging_disabled_keeps_close_pair() {
    let hits = two_clusters(80.0, 1.0, 82.0, 1.0);
    let reco = calorimeter_engine(false)
        .reconstruct(EventId(0), &hits)
        .unwrap();
    assert_eq!(reco.clusters.len(), 2);
}

#[test]
fn custom_window_widens_merging() {
    let merge = MergeConfig {
        near_distance: 50.0,
        far_distance: 60.0,
        ..MergeConfig::default()
    };
    let engine = ClusterEngine::with_config(ClusterConfig::calorimeter().with_merge(merge)).unwrap();
    let hits = two_clusters(80.0, 1.0, 120.0, 1.0);
    assert_eq!(engine.reconstruct(EventId(0), &hits).unwrap().clusters.len(), 1);
}

#[test]
fn satellites_absorbed_into_leader_one_by_one() {
    let hits = vec![
        hit_at_y(0, 2, 2, 6.0, 80.0),
        hit_at_y(1, 20, 2, 1.0, 84.0),
        hit_at_y(2, 40, 2, 0.5, 76.0),
        hit_at_y(3, 60, 2, 2.0, 150.0),
    ];
    let reco = calorimeter_engine(true)
        .reconstruct(EventId(0), &hits)
        .unwrap();
    let energies: Vec<f64> = reco.clusters.iter().map(|c| c.energy).collect();
    assert_eq!(energies, vec![7.5, 2.0]);
    check_partition(&reco).unwrap();
}
