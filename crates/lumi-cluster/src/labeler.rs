//! Cluster labeling over the neighbor graph.
//!
//! Two fixpoint phases:
//! 1. **Seeding**: every local maximum (a tower whose neighbor sits on its
//!    own cell) gets a fresh id, increasing in tower order.
//! 2. **Propagation**: unlabeled towers copy the id of their neighbor, scan
//!    after scan, until every tower carries an id.
//!
//! Neighbor links never point to a weaker tower, so every chain ends at a
//! local maximum. A scan that labels nothing while towers remain unlabeled
//! means the graph was built wrong and is reported as an error.

use lumi_core::error::ClusterError;
use lumi_core::types::Tower;
use tracing::trace;

/// Index of the neighbor of `towers[index]`, checked against the collection.
fn neighbor_index(towers: &[Tower], index: usize) -> Result<usize, ClusterError> {
    let neighbor = towers[index]
        .neighbor
        .ok_or(ClusterError::MissingNeighbor { tower: index })?;
    if neighbor.index() >= towers.len() {
        return Err(ClusterError::MalformedNeighborGraph {
            tower: index,
            neighbor: neighbor.index(),
            towers: towers.len(),
        });
    }
    Ok(neighbor.index())
}

/// Whether `towers[index]` is a local maximum.
///
/// Compares cells rather than indices: a tower is a maximum when its
/// neighbor occupies the same `(sector, pad)`.
pub fn is_local_maximum(towers: &[Tower], index: usize) -> Result<bool, ClusterError> {
    let neighbor = neighbor_index(towers, index)?;
    Ok(towers[neighbor].cell() == towers[index].cell())
}

/// Clear all labels and give each local maximum a fresh id.
///
/// Returns the number of seeds, which is also the number of clusters.
pub fn seed_clusters(towers: &mut [Tower]) -> Result<usize, ClusterError> {
    for tower in towers.iter_mut() {
        tower.cluster = None;
    }

    let mut next_id = 0;
    for index in 0..towers.len() {
        if is_local_maximum(towers, index)? {
            towers[index].cluster = Some(next_id);
            next_id += 1;
        }
    }
    Ok(next_id)
}

/// Copy neighbor ids onto unlabeled towers until none is left.
///
/// Returns the number of scans performed.
pub fn propagate_labels(towers: &mut [Tower]) -> Result<usize, ClusterError> {
    let mut scans = 0;
    loop {
        scans += 1;
        let mut assigned = 0;
        let mut unlabeled = 0;

        for index in 0..towers.len() {
            if towers[index].cluster.is_some() {
                continue;
            }
            let neighbor = neighbor_index(towers, index)?;
            match towers[neighbor].cluster {
                Some(id) => {
                    towers[index].cluster = Some(id);
                    assigned += 1;
                }
                None => unlabeled += 1,
            }
        }

        trace!(scan = scans, assigned, unlabeled, "labeler: propagation scan");

        if unlabeled == 0 {
            return Ok(scans);
        }
        if assigned == 0 {
            return Err(ClusterError::UnresolvedTowers { count: unlabeled });
        }
    }
}

/// Label every tower with a cluster id. Returns the number of clusters.
///
/// Requires [`resolve_neighbors`](crate::neighbor::resolve_neighbors) to
/// have run on `towers`.
pub fn label_clusters(towers: &mut [Tower]) -> Result<usize, ClusterError> {
    let clusters = seed_clusters(towers)?;
    propagate_labels(towers)?;
    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbor::resolve_neighbors;
    use crate::tower::aggregate_towers;
    use lumi_core::types::{Cell, Hit, TowerId};
    use proptest::prelude::*;

    fn tower(sector: i32, pad: i32, energy: f64) -> Tower {
        Tower::from_hits(Cell::new(sector, pad), vec![Hit::new(sector, pad, 2, energy)])
    }

    fn labeled(mut towers: Vec<Tower>) -> (Vec<Tower>, usize) {
        resolve_neighbors(&mut towers);
        let n = label_clusters(&mut towers).unwrap();
        (towers, n)
    }

    // --- seeding ---

    #[test]
    fn seeds_follow_tower_order() {
        let (towers, n) = labeled(vec![tower(1, 10, 5.0), tower(1, 40, 3.0), tower(2, 60, 1.0)]);
        assert_eq!(n, 3);
        assert_eq!(towers[0].cluster, Some(0));
        assert_eq!(towers[1].cluster, Some(1));
        assert_eq!(towers[2].cluster, Some(2));
    }

    #[test]
    fn seeding_clears_previous_labels() {
        let mut towers = vec![tower(1, 10, 5.0), tower(1, 11, 1.0)];
        resolve_neighbors(&mut towers);
        towers[1].cluster = Some(42);
        assert_eq!(seed_clusters(&mut towers).unwrap(), 1);
        assert_eq!(towers[1].cluster, None);
    }

    // --- propagation ---

    #[test]
    fn chain_inherits_maximum_id() {
        // Energies fall away from pad 30: a single chain into one seed.
        let (towers, n) = labeled(vec![
            tower(1, 30, 10.0),
            tower(1, 31, 6.0),
            tower(1, 32, 3.0),
            tower(1, 33, 1.0),
        ]);
        assert_eq!(n, 1);
        assert!(towers.iter().all(|t| t.cluster == Some(0)));
    }

    #[test]
    fn valley_splits_two_clusters() {
        let (towers, n) = labeled(vec![
            tower(1, 30, 10.0),
            tower(1, 36, 8.0),
            tower(1, 31, 4.0),
            tower(1, 35, 4.0),
            tower(1, 32, 2.0),
            tower(1, 34, 2.0),
            tower(1, 33, 1.0),
        ]);
        assert_eq!(n, 2);
        let id = |pad: i32| towers.iter().find(|t| t.pad == pad).unwrap().cluster.unwrap();
        assert_eq!(id(30), id(31));
        assert_eq!(id(31), id(32));
        assert_eq!(id(36), id(35));
        assert_eq!(id(35), id(34));
        assert_ne!(id(30), id(36));
        // Pad 33 touches pads 32 and 34 with equal energy: the first in
        // tower order (pad 32) wins.
        assert_eq!(id(33), id(32));
    }

    #[test]
    fn long_chain_needs_several_scans() {
        // Weakest tower first: each scan labels one more link.
        let mut towers = vec![
            tower(1, 33, 1.0),
            tower(1, 32, 2.0),
            tower(1, 31, 3.0),
            tower(1, 30, 4.0),
        ];
        resolve_neighbors(&mut towers);
        assert_eq!(seed_clusters(&mut towers).unwrap(), 1);
        assert_eq!(propagate_labels(&mut towers).unwrap(), 3);
        assert!(towers.iter().all(|t| t.cluster == Some(0)));
    }

    #[test]
    fn strongest_first_chain_resolves_in_one_scan() {
        // Labels set earlier in a scan are visible later in the same scan.
        let mut towers = vec![
            tower(1, 30, 4.0),
            tower(1, 31, 3.0),
            tower(1, 32, 2.0),
            tower(1, 33, 1.0),
        ];
        resolve_neighbors(&mut towers);
        seed_clusters(&mut towers).unwrap();
        assert_eq!(propagate_labels(&mut towers).unwrap(), 1);
    }

    // --- malformed graphs ---

    #[test]
    fn missing_neighbor_is_an_error() {
        let mut towers = vec![tower(1, 30, 1.0)];
        assert_eq!(
            label_clusters(&mut towers).unwrap_err(),
            ClusterError::MissingNeighbor { tower: 0 }
        );
    }

    #[test]
    fn out_of_range_neighbor_is_an_error() {
        let mut towers = vec![tower(1, 30, 1.0)];
        towers[0].neighbor = Some(TowerId(5));
        assert_eq!(
            label_clusters(&mut towers).unwrap_err(),
            ClusterError::MalformedNeighborGraph {
                tower: 0,
                neighbor: 5,
                towers: 1
            }
        );
    }

    #[test]
    fn cycle_without_maximum_is_an_error() {
        let mut towers = vec![tower(1, 30, 1.0), tower(1, 31, 1.0)];
        towers[0].neighbor = Some(TowerId(1));
        towers[1].neighbor = Some(TowerId(0));
        assert_eq!(
            label_clusters(&mut towers).unwrap_err(),
            ClusterError::UnresolvedTowers { count: 2 }
        );
    }

    #[test]
    fn empty_collection_has_no_clusters() {
        let mut towers: Vec<Tower> = Vec::new();
        assert_eq!(label_clusters(&mut towers).unwrap(), 0);
    }

    proptest! {
        #[test]
        fn every_tower_labeled_with_dense_ids(
            cells in prop::collection::vec((0i32..4, 0i32..64, 1u32..50), 0..80),
        ) {
            let hits: Vec<Hit> = cells
                .iter()
                .map(|&(s, p, e)| Hit::new(s, p, 2, e as f64))
                .collect();
            let mut towers = aggregate_towers(&hits);
            let maxima = resolve_neighbors(&mut towers);
            let n = label_clusters(&mut towers).unwrap();
            prop_assert_eq!(n, maxima);
            for t in &towers {
                let id = t.cluster.unwrap();
                prop_assert!(id < n);
            }
            for id in 0..n {
                prop_assert!(towers.iter().any(|t| t.cluster == Some(id)));
            }
        }
    }
}
