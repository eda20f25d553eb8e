//! JSON event input.
//!
//! The input file holds an array of events:
//!
//! ```json
//! [{"id": 0, "hits": [{"sector": 1, "pad": 30, "layer": 4, "energy": 2.5}]}]
//! ```
//!
//! Cells must lie on the detector. Hit coordinates `x`, `y`, `rho`, `phi`
//! are optional; when any is missing the cell centre from the detector
//! geometry is used instead.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use lumi_cluster::Event;
use lumi_core::constants::{N_PADS, N_SECTORS};
use lumi_core::error::LumiError;
use lumi_core::geometry::{cell_position, CellPosition};
use lumi_core::types::Hit;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct HitRecord {
    sector: i32,
    pad: i32,
    layer: i32,
    energy: f64,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    rho: Option<f64>,
    #[serde(default)]
    phi: Option<f64>,
}

impl HitRecord {
    fn check(&self, event: u64) -> Result<(), LumiError> {
        if !(0..N_SECTORS).contains(&self.sector) || !(0..N_PADS).contains(&self.pad) {
            return Err(LumiError::Input(format!(
                "event {event}: hit in layer {} at sector {} pad {} is outside the detector",
                self.layer, self.sector, self.pad
            )));
        }
        Ok(())
    }

    fn into_hit(self) -> Hit {
        let position = match (self.x, self.y, self.rho, self.phi) {
            (Some(x), Some(y), Some(rho), Some(phi)) => CellPosition { rho, phi, x, y },
            _ => cell_position(self.sector, self.pad),
        };
        Hit::with_coordinates(self.sector, self.pad, self.layer, self.energy, position)
    }
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    id: u64,
    hits: Vec<HitRecord>,
}

/// Parse events from JSON text.
pub fn parse_events(json: &str) -> Result<Vec<Event>> {
    let records: Vec<EventRecord> =
        serde_json::from_str(json).context("malformed event JSON")?;
    let mut events = Vec::with_capacity(records.len());
    for record in records {
        for hit in &record.hits {
            hit.check(record.id)?;
        }
        let hits = record.hits.into_iter().map(HitRecord::into_hit).collect();
        events.push(Event::new(record.id, hits));
    }
    Ok(events)
}

/// Read events from `path`.
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let events =
        parse_events(&json).with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(path = %path.display(), events = events.len(), "input: events loaded");
    Ok(events)
}

/// Drop hits outside `layers` from every event. Returns the number dropped.
pub fn select_layers(events: &mut [Event], layers: &RangeInclusive<i32>) -> usize {
    let mut dropped = 0;
    for event in events.iter_mut() {
        let before = event.hits.len();
        event.retain_layers(|layer| layers.contains(&layer));
        dropped += before - event.hits.len();
    }
    dropped
}
