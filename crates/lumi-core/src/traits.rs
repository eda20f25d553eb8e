//! Trait interfaces for LumiCal reconstruction.
//!
//! - [`ClusterReconstructor`]: hits in, energy-sorted clusters out (lumi-cluster implements)
//! - [`ReconstructionObserver`]: side-channel hooks for progress, timing and logging

use crate::error::ClusterError;
use crate::types::{Cluster, DetectorKind, EventId, Hit, Reconstruction};

/// Pipeline stages reported to a [`ReconstructionObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Hits grouped into towers. Count: towers.
    Towers,
    /// Neighbor links resolved. Count: local maxima.
    Neighbors,
    /// Cluster ids propagated. Count: cluster ids.
    Labels,
    /// Clusters built and energy-sorted. Count: clusters.
    Clusters,
    /// Merge loop finished. Count: clusters left.
    Merged,
}

/// One merge applied by the cluster merger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeRecord {
    /// List position of the surviving cluster before the merge.
    pub survivor: usize,
    /// List position of the absorbed cluster before the merge.
    pub absorbed: usize,
    /// `|survivor.y - absorbed.y|`.
    pub distance: f64,
    /// `absorbed.energy / survivor.energy`.
    pub ratio: f64,
}

/// Per-event reconstruction of clusters from calibrated hits.
///
/// Implementations are pure: the same hits in the same order always yield
/// bit-identical clusters, and no state carries over between events.
pub trait ClusterReconstructor: Send + Sync {
    /// Detector type whose weighting policy this reconstructor applies.
    fn detector(&self) -> DetectorKind;

    /// Reconstruct one event, keeping the tower collection alongside the clusters.
    fn reconstruct(&self, event: EventId, hits: &[Hit]) -> Result<Reconstruction, ClusterError>;

    /// Reconstruct one event and return only its clusters.
    ///
    /// Default implementation delegates to [`reconstruct`](Self::reconstruct).
    fn clusters(&self, event: EventId, hits: &[Hit]) -> Result<Vec<Cluster>, ClusterError> {
        Ok(self.reconstruct(event, hits)?.clusters)
    }
}

/// Hooks invoked while an event is reconstructed.
///
/// Every method has an empty default so observers implement only what they
/// need. Observers take `&self` and must be `Sync`: batch reconstruction may
/// call them from several worker threads at once.
pub trait ReconstructionObserver: Send + Sync {
    fn event_started(&self, _event: EventId, _hits: usize) {}

    fn stage_finished(&self, _event: EventId, _stage: Stage, _count: usize) {}

    fn clusters_merged(&self, _event: EventId, _merge: &MergeRecord) {}

    fn event_finished(&self, _event: EventId, _clusters: &[Cluster]) {}
}

/// Observer that ignores every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReconstructionObserver for NoopObserver {}

impl<O: ReconstructionObserver + ?Sized> ReconstructionObserver for &O {
    fn event_started(&self, event: EventId, hits: usize) {
        (**self).event_started(event, hits)
    }

    fn stage_finished(&self, event: EventId, stage: Stage, count: usize) {
        (**self).stage_finished(event, stage, count)
    }

    fn clusters_merged(&self, event: EventId, merge: &MergeRecord) {
        (**self).clusters_merged(event, merge)
    }

    fn event_finished(&self, event: EventId, clusters: &[Cluster]) {
        (**self).event_finished(event, clusters)
    }
}
