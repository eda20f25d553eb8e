//! Reconstruction of many events, sequentially or across a rayon pool.
//!
//! Events never share state, so the parallel path only changes scheduling:
//! results come back in input order and match the sequential path exactly.

use lumi_core::error::ClusterError;
use lumi_core::traits::ReconstructionObserver;
use lumi_core::types::{EventId, Hit, Reconstruction};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ClusterEngine;

/// Calibrated hits of one triggered event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub hits: Vec<Hit>,
}

impl Event {
    pub fn new(id: u64, hits: Vec<Hit>) -> Self {
        Self {
            id: EventId(id),
            hits,
        }
    }

    /// Keep only hits whose layer satisfies `keep`.
    pub fn retain_layers<F>(&mut self, mut keep: F)
    where
        F: FnMut(i32) -> bool,
    {
        self.hits.retain(|hit| keep(hit.layer));
    }
}

/// Reconstruct `events` one after another on the calling thread.
///
/// Stops at the first event that fails.
pub fn reconstruct_events<O>(
    engine: &ClusterEngine,
    events: &[Event],
    observer: &O,
) -> Result<Vec<Reconstruction>, ClusterError>
where
    O: ReconstructionObserver + ?Sized,
{
    debug!(events = events.len(), "batch: sequential reconstruction");
    events
        .iter()
        .map(|event| engine.reconstruct_observed(event.id, &event.hits, observer))
        .collect()
}

/// Reconstruct `events` on the global rayon pool, in input order.
///
/// Observer hooks of different events may interleave.
pub fn par_reconstruct_events<O>(
    engine: &ClusterEngine,
    events: &[Event],
    observer: &O,
) -> Result<Vec<Reconstruction>, ClusterError>
where
    O: ReconstructionObserver + ?Sized,
{
    debug!(
        events = events.len(),
        threads = rayon::current_num_threads(),
        "batch: parallel reconstruction"
    );
    events
        .par_iter()
        .map(|event| engine.reconstruct_observed(event.id, &event.hits, observer))
        .collect()
}
