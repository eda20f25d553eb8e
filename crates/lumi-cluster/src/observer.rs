//! Observer emitting `tracing` events for every reconstruction hook.

use lumi_core::traits::{MergeRecord, ReconstructionObserver, Stage};
use lumi_core::types::{Cluster, EventId};
use tracing::{debug, trace};

/// Logs stages at `trace` and merges and results at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReconstructionObserver for TracingObserver {
    fn event_started(&self, event: EventId, hits: usize) {
        trace!(%event, hits, "reco: event started");
    }

    fn stage_finished(&self, event: EventId, stage: Stage, count: usize) {
        trace!(%event, ?stage, count, "reco: stage finished");
    }

    fn clusters_merged(&self, event: EventId, merge: &MergeRecord) {
        debug!(
            %event,
            survivor = merge.survivor,
            absorbed = merge.absorbed,
            distance = merge.distance,
            ratio = merge.ratio,
            "reco: clusters merged"
        );
    }

    fn event_finished(&self, event: EventId, clusters: &[Cluster]) {
        let leading = clusters.first().map(|c| c.energy).unwrap_or(0.0);
        debug!(%event, clusters = clusters.len(), leading, "reco: event finished");
    }
}
