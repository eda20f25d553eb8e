//! Progress reporting for long batch runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use lumi_cluster::TracingObserver;
use lumi_core::traits::{MergeRecord, ReconstructionObserver, Stage};
use lumi_core::types::{Cluster, EventId};
use tracing::info;

/// Counts finished events and logs every `every` of them with the elapsed
/// time. Stage and merge hooks are forwarded to a [`TracingObserver`].
#[derive(Debug)]
pub struct ProgressObserver {
    every: u64,
    total: u64,
    finished: AtomicU64,
    started: Instant,
    inner: TracingObserver,
}

impl ProgressObserver {
    pub fn new(every: u64, total: u64) -> Self {
        Self {
            every,
            total,
            finished: AtomicU64::new(0),
            started: Instant::now(),
            inner: TracingObserver,
        }
    }

    pub fn finished(&self) -> u64 {
        self.finished.load(Ordering::Relaxed)
    }
}

impl ReconstructionObserver for ProgressObserver {
    fn event_started(&self, event: EventId, hits: usize) {
        self.inner.event_started(event, hits);
    }

    fn stage_finished(&self, event: EventId, stage: Stage, count: usize) {
        self.inner.stage_finished(event, stage, count);
    }

    fn clusters_merged(&self, event: EventId, merge: &MergeRecord) {
        self.inner.clusters_merged(event, merge);
    }

    fn event_finished(&self, event: EventId, clusters: &[Cluster]) {
        self.inner.event_finished(event, clusters);
        let done = self.finished.fetch_add(1, Ordering::Relaxed) + 1;
        if self.every > 0 && done % self.every == 0 {
            info!(
                done,
                total = self.total,
                elapsed_secs = self.started.elapsed().as_secs_f64(),
                "reco: progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_finished_events() {
        let progress = ProgressObserver::new(2, 5);
        for i in 0..5 {
            progress.event_finished(EventId(i), &[]);
        }
        assert_eq!(progress.finished(), 5);
    }

    #[test]
    fn zero_interval_never_divides() {
        let progress = ProgressObserver::new(0, 1);
        progress.event_finished(EventId(0), &[]);
        assert_eq!(progress.finished(), 1);
    }
}
