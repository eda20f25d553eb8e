//! Iterative cluster merging.
//!
//! Ordered pairs `(c1, c2)` are scanned in list order. The first pair the
//! [`MergeConfig`] window accepts is merged (`c1` absorbs `c2`), and the scan
//! restarts from the top because the list changed. The loop ends after a
//! full pass without a merge, then clusters are re-sorted by energy and
//! renumbered.
//!
//! The rule is directional: `ratio = c2.energy / c1.energy`, so a weak
//! satellite listed after a dominant cluster is absorbed by it.

use lumi_core::traits::MergeRecord;
use lumi_core::types::{Cluster, Tower};
use tracing::debug;

use crate::builder::{refresh_cluster, sort_and_renumber};
use crate::config::{ClusterConfig, MergeConfig};

/// First ordered pair in list order that the merge window accepts.
pub fn find_merge(clusters: &[Cluster], merge: &MergeConfig) -> Option<MergeRecord> {
    for (i, c1) in clusters.iter().enumerate() {
        for (j, c2) in clusters.iter().enumerate() {
            if i == j {
                continue;
            }
            let distance = (c1.y - c2.y).abs();
            let ratio = c2.energy / c1.energy;
            if merge.accepts(distance, ratio) {
                return Some(MergeRecord {
                    survivor: i,
                    absorbed: j,
                    distance,
                    ratio,
                });
            }
        }
    }
    None
}

/// Move the hits and towers of `clusters[record.absorbed]` into
/// `clusters[record.survivor]` and drop the absorbed cluster.
///
/// Absorbed towers take the survivor's id. The survivor's energy, weights
/// and positions are recomputed from the combined hits.
pub fn absorb(
    clusters: &mut Vec<Cluster>,
    towers: &mut [Tower],
    record: &MergeRecord,
    config: &ClusterConfig,
) {
    let absorbed = clusters.remove(record.absorbed);
    let survivor_index = if record.absorbed < record.survivor {
        record.survivor - 1
    } else {
        record.survivor
    };
    let survivor = &mut clusters[survivor_index];

    for tower in &absorbed.towers {
        towers[tower.index()].cluster = Some(survivor.id);
    }
    survivor.hits.extend(absorbed.hits);
    survivor.towers.extend(absorbed.towers);
    refresh_cluster(survivor, config);
}

/// Merge until no pair qualifies, then re-sort and renumber.
///
/// `on_merge` sees every applied merge with list positions from before it.
/// Returns the number of merges.
pub fn merge_clusters<F>(
    clusters: &mut Vec<Cluster>,
    towers: &mut [Tower],
    config: &ClusterConfig,
    mut on_merge: F,
) -> usize
where
    F: FnMut(&MergeRecord),
{
    let mut merges = 0;
    while let Some(record) = find_merge(clusters, &config.merge) {
        debug!(
            survivor = record.survivor,
            absorbed = record.absorbed,
            distance = record.distance,
            ratio = record.ratio,
            "merge: absorbing cluster"
        );
        on_merge(&record);
        absorb(clusters, towers, &record, config);
        merges += 1;
    }
    sort_and_renumber(clusters, towers);
    merges
}
