//! Cluster engine implementing the [`ClusterReconstructor`] trait.
//!
//! Runs the per-event pipeline:
//! - group hits into towers by `(sector, pad)`
//! - link each tower to its most energetic neighbor
//! - label towers by following links to local maxima
//! - build log- or energy-weighted clusters
//! - optionally merge nearby satellites into dominant clusters
//!
//! Every stage works on the event's own tower collection; nothing is shared
//! between events, so one engine can serve many threads.

use lumi_core::error::{ClusterError, ConfigError};
use lumi_core::traits::{ClusterReconstructor, NoopObserver, ReconstructionObserver, Stage};
use lumi_core::types::{DetectorKind, EventId, Hit, Reconstruction};
use tracing::debug;

use crate::builder::build_clusters;
use crate::config::ClusterConfig;
use crate::labeler::label_clusters;
use crate::merge::merge_clusters;
use crate::neighbor::resolve_neighbors;
use crate::tower::aggregate_towers;

/// The production cluster reconstructor.
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    config: ClusterConfig,
}

impl ClusterEngine {
    /// Engine with the calorimeter defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a validated custom configuration.
    pub fn with_config(config: ClusterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Reconstruct one event, reporting every stage to `observer`.
    pub fn reconstruct_observed<O>(
        &self,
        event: EventId,
        hits: &[Hit],
        observer: &O,
    ) -> Result<Reconstruction, ClusterError>
    where
        O: ReconstructionObserver + ?Sized,
    {
        observer.event_started(event, hits.len());

        let mut towers = aggregate_towers(hits);
        observer.stage_finished(event, Stage::Towers, towers.len());

        let maxima = resolve_neighbors(&mut towers);
        observer.stage_finished(event, Stage::Neighbors, maxima);

        let n_clusters = label_clusters(&mut towers)?;
        observer.stage_finished(event, Stage::Labels, n_clusters);

        let mut clusters = build_clusters(&mut towers, n_clusters, &self.config)?;
        observer.stage_finished(event, Stage::Clusters, clusters.len());

        if self.config.merging {
            let merges = merge_clusters(&mut clusters, &mut towers, &self.config, |record| {
                observer.clusters_merged(event, record)
            });
            observer.stage_finished(event, Stage::Merged, clusters.len());
            debug!(%event, merges, clusters = clusters.len(), "engine: merge loop done");
        }

        debug!(
            %event,
            hits = hits.len(),
            towers = towers.len(),
            clusters = clusters.len(),
            "engine: event reconstructed"
        );
        observer.event_finished(event, &clusters);

        Ok(Reconstruction {
            event,
            towers,
            clusters,
        })
    }
}

impl ClusterReconstructor for ClusterEngine {
    fn detector(&self) -> DetectorKind {
        self.config.detector
    }

    fn reconstruct(&self, event: EventId, hits: &[Hit]) -> Result<Reconstruction, ClusterError> {
        self.reconstruct_observed(event, hits, &NoopObserver)
    }
}
