//! Cluster construction from labeled towers.
//!
//! A cluster takes every hit of every tower carrying its id. Its energy is
//! the plain hit sum; its positions are weighted averages over hits:
//! - calorimeter: `w = max(0, w0 + ln(E_hit / E_cluster))`, which drops
//!   hits far below the cluster energy scale;
//! - tracker: `w = E_hit`.
//!
//! When all weights vanish the position is [`INVALID_POSITION`] instead of
//! a division by zero. Merging carries that sentinel through unchanged.

use std::cmp::Reverse;

use lumi_core::constants::INVALID_POSITION;
use lumi_core::error::ClusterError;
use lumi_core::types::{Cluster, Coordinate, DetectorKind, Hit, Tower, TowerId};
use ordered_float::OrderedFloat;

use crate::config::ClusterConfig;

/// Per-hit position weights of a cluster with total energy `energy`.
pub fn hit_weights(hits: &[Hit], energy: f64, detector: DetectorKind, w0: f64) -> Vec<f64> {
    match detector {
        DetectorKind::Calorimeter => hits
            .iter()
            // NaN from non-positive ratios collapses to 0 via f64::max.
            .map(|hit| (w0 + (hit.energy / energy).ln()).max(0.0))
            .collect(),
        DetectorKind::Tracker => hits.iter().map(|hit| hit.energy).collect(),
    }
}

/// Weighted mean of `coordinate` over `hits`, or [`INVALID_POSITION`] if
/// the weights sum to zero.
pub fn weighted_position(hits: &[Hit], weights: &[f64], coordinate: Coordinate) -> f64 {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return INVALID_POSITION;
    }
    let moment: f64 = hits
        .iter()
        .zip(weights)
        .map(|(hit, w)| hit.coordinate(coordinate) * w)
        .sum();
    moment / total
}

/// Recompute energy, weights, positions and size from the cluster's hits.
pub fn refresh_cluster(cluster: &mut Cluster, config: &ClusterConfig) {
    cluster.energy = cluster.hits.iter().map(|h| h.energy).sum();
    cluster.weights = hit_weights(
        &cluster.hits,
        cluster.energy,
        config.detector,
        config.log_weight_w0,
    );
    let hits = &cluster.hits;
    let weights = &cluster.weights;
    let position = |c| weighted_position(hits, weights, c);
    let (pad, sector, layer, rho, x, y) = (
        position(Coordinate::Pad),
        position(Coordinate::Sector),
        position(Coordinate::Layer),
        position(Coordinate::Rho),
        position(Coordinate::X),
        position(Coordinate::Y),
    );
    cluster.pad = pad;
    cluster.sector = sector;
    cluster.layer = layer;
    cluster.rho = rho;
    cluster.x = x;
    cluster.y = y;
    cluster.n_pads = cluster.hits.len();
}

/// Build a cluster from its hits and member towers.
pub fn assemble_cluster(
    id: usize,
    hits: Vec<Hit>,
    towers: Vec<TowerId>,
    config: &ClusterConfig,
) -> Cluster {
    let mut cluster = Cluster {
        id,
        hits,
        towers,
        energy: 0.0,
        weights: Vec::new(),
        pad: INVALID_POSITION,
        sector: INVALID_POSITION,
        layer: INVALID_POSITION,
        rho: INVALID_POSITION,
        x: INVALID_POSITION,
        y: INVALID_POSITION,
        n_pads: 0,
    };
    refresh_cluster(&mut cluster, config);
    cluster
}

/// Sort clusters by descending energy and write each rank back as the id of
/// the cluster and of its member towers.
///
/// The sort is stable: equal-energy clusters keep their relative order.
pub fn sort_and_renumber(clusters: &mut [Cluster], towers: &mut [Tower]) {
    clusters.sort_by_key(|c| Reverse(OrderedFloat(c.energy)));
    for (rank, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = rank;
        for tower in &cluster.towers {
            towers[tower.index()].cluster = Some(rank);
        }
    }
}

/// Build one cluster per id from towers labeled `0..n_clusters`.
///
/// Hits are collected in tower order. The result is energy-sorted and
/// tower ids are renumbered to match.
pub fn build_clusters(
    towers: &mut [Tower],
    n_clusters: usize,
    config: &ClusterConfig,
) -> Result<Vec<Cluster>, ClusterError> {
    let mut groups: Vec<(Vec<Hit>, Vec<TowerId>)> = vec![(Vec::new(), Vec::new()); n_clusters];

    for (index, tower) in towers.iter().enumerate() {
        let id = tower
            .cluster
            .ok_or(ClusterError::UnlabeledTower { tower: index })?;
        let group = groups.get_mut(id).ok_or(ClusterError::NonDenseClusterIds {
            expected: n_clusters,
            found: id + 1,
        })?;
        group.0.extend_from_slice(&tower.hits);
        group.1.push(TowerId(index));
    }

    let populated = groups.iter().filter(|(_, t)| !t.is_empty()).count();
    if populated != n_clusters {
        return Err(ClusterError::NonDenseClusterIds {
            expected: n_clusters,
            found: populated,
        });
    }

    let mut clusters: Vec<Cluster> = groups
        .into_iter()
        .enumerate()
        .map(|(id, (hits, members))| assemble_cluster(id, hits, members, config))
        .collect();
    sort_and_renumber(&mut clusters, towers);
    Ok(clusters)
}
