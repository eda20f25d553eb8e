//! Per-event quantities derived from the final cluster list.

use lumi_core::types::Cluster;
use serde::{Deserialize, Serialize};

/// Number of sub-leading clusters compared against the leading one.
pub const LEADING_PAIRS: usize = 3;

/// Separation of sub-leading cluster `index` from the leading cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairMetrics {
    /// Rank of the sub-leading cluster, `1..=3`.
    pub index: usize,
    pub pad_distance: f64,
    pub y_distance: f64,
    /// `energy[index] / energy[0]`.
    pub energy_ratio: f64,
}

impl PairMetrics {
    fn between(leading: &Cluster, other: &Cluster, index: usize) -> Self {
        Self {
            index,
            pad_distance: (leading.pad - other.pad).abs(),
            y_distance: (leading.y - other.y).abs(),
            energy_ratio: other.energy / leading.energy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventSummary {
    pub n_clusters: usize,
    pub total_energy: f64,
    /// Energies of clusters made of a single hit.
    pub single_pad_energies: Vec<f64>,
    pub leading_pairs: Vec<PairMetrics>,
}

impl EventSummary {
    /// Summarize energy-sorted clusters.
    pub fn from_clusters(clusters: &[Cluster]) -> Self {
        let leading_pairs = match clusters.split_first() {
            Some((leading, rest)) => rest
                .iter()
                .take(LEADING_PAIRS)
                .enumerate()
                .map(|(i, other)| PairMetrics::between(leading, other, i + 1))
                .collect(),
            None => Vec::new(),
        };

        Self {
            n_clusters: clusters.len(),
            total_energy: clusters.iter().map(|c| c.energy).sum(),
            single_pad_energies: clusters
                .iter()
                .filter(|c| c.n_pads == 1)
                .map(|c| c.energy)
                .collect(),
            leading_pairs,
        }
    }
}
