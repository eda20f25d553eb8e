//! JSON-lines output: one line per reconstructed event.

use std::io::Write;

use anyhow::{Context, Result};
use lumi_cluster::EventSummary;
use lumi_core::types::{Cluster, EventId, Reconstruction};
use serde::Serialize;

/// Cluster fields written per event; hits and weights are left out.
#[derive(Debug, Serialize)]
pub struct ClusterRecord {
    pub id: usize,
    pub energy: f64,
    pub n_pads: usize,
    pub n_towers: usize,
    pub pad: f64,
    pub sector: f64,
    pub layer: f64,
    pub rho: f64,
    pub x: f64,
    pub y: f64,
}

impl From<&Cluster> for ClusterRecord {
    fn from(c: &Cluster) -> Self {
        Self {
            id: c.id,
            energy: c.energy,
            n_pads: c.n_pads,
            n_towers: c.towers.len(),
            pad: c.pad,
            sector: c.sector,
            layer: c.layer,
            rho: c.rho,
            x: c.x,
            y: c.y,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventRecord {
    pub event: EventId,
    pub clusters: Vec<ClusterRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<EventSummary>,
}

impl EventRecord {
    pub fn new(reco: &Reconstruction, with_summary: bool) -> Self {
        Self {
            event: reco.event,
            clusters: reco.clusters.iter().map(ClusterRecord::from).collect(),
            summary: with_summary.then(|| EventSummary::from_clusters(&reco.clusters)),
        }
    }
}

/// Write one JSON line per reconstruction to `out`.
pub fn write_records<W: Write>(
    out: &mut W,
    reconstructions: &[Reconstruction],
    with_summary: bool,
) -> Result<()> {
    for reco in reconstructions {
        let record = EventRecord::new(reco, with_summary);
        serde_json::to_writer(&mut *out, &record)
            .with_context(|| format!("failed to write event {}", reco.event))?;
        out.write_all(b"\n").context("failed to write output")?;
    }
    out.flush().context("failed to flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumi_cluster::ClusterEngine;
    use lumi_core::traits::ClusterReconstructor;
    use lumi_core::types::Hit;

    fn reconstructions() -> Vec<Reconstruction> {
        let engine = ClusterEngine::new();
        vec![
            engine
                .reconstruct(
                    EventId(0),
                    &[Hit::new(1, 10, 2, 4.0), Hit::new(1, 11, 3, 1.0), Hit::new(3, 50, 2, 2.0)],
                )
                .unwrap(),
            engine.reconstruct(EventId(1), &[]).unwrap(),
        ]
    }

    #[test]
    fn one_line_per_event() {
        let mut buf = Vec::new();
        write_records(&mut buf, &reconstructions(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], 0);
        assert_eq!(first["clusters"].as_array().unwrap().len(), 2);
        assert_eq!(first["clusters"][0]["energy"], 5.0);
        assert_eq!(first["clusters"][0]["n_towers"], 2);
        assert!(first.get("summary").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert!(second["clusters"].as_array().unwrap().is_empty());
    }

    #[test]
    fn summary_included_on_request() {
        let mut buf = Vec::new();
        write_records(&mut buf, &reconstructions(), true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["summary"]["n_clusters"], 2);
        assert_eq!(first["summary"]["total_energy"], 7.0);
        assert_eq!(first["summary"]["leading_pairs"][0]["index"], 1);
    }
}
