//! Shared builders and checks for the integration tests.

use lumi_cluster::{ClusterConfig, ClusterEngine, Event};
use lumi_core::geometry::CellPosition;
use lumi_core::types::{Hit, Reconstruction};

/// Calorimeter hit at a geometry-derived position.
pub fn cal_hit(sector: i32, pad: i32, layer: i32, energy: f64) -> Hit {
    Hit::new(sector, pad, layer, energy)
}

/// Hit whose `y` is set directly, for merge-distance scenarios.
///
/// `rho` equals `y` and `x` is zero, as for a cell on the vertical axis.
pub fn hit_at_y(sector: i32, pad: i32, layer: i32, energy: f64, y: f64) -> Hit {
    let position = CellPosition {
        rho: y,
        phi: std::f64::consts::FRAC_PI_2,
        x: 0.0,
        y,
    };
    Hit::with_coordinates(sector, pad, layer, energy, position)
}

/// Longitudinal shower: one hit per layer from layer 2 on, all in one cell.
pub fn shower(sector: i32, pad: i32, layer_energies: &[f64]) -> Vec<Hit> {
    layer_energies
        .iter()
        .enumerate()
        .map(|(i, &e)| cal_hit(sector, pad, 2 + i as i32, e))
        .collect()
}

/// Lateral profile along pads: `pad_energies[i]` lands on `first_pad + i`.
pub fn pad_profile(sector: i32, first_pad: i32, layer: i32, pad_energies: &[f64]) -> Vec<Hit> {
    pad_energies
        .iter()
        .enumerate()
        .map(|(i, &e)| cal_hit(sector, first_pad + i as i32, layer, e))
        .collect()
}

pub fn event(id: u64, hits: Vec<Hit>) -> Event {
    Event::new(id, hits)
}

/// Calorimeter engine with merging switched on or off.
pub fn calorimeter_engine(merging: bool) -> ClusterEngine {
    ClusterEngine::with_config(ClusterConfig::calorimeter().with_merging(merging))
        .expect("valid calorimeter config")
}

/// Tracker engine with merging switched off.
pub fn tracker_engine() -> ClusterEngine {
    ClusterEngine::with_config(ClusterConfig::tracker().with_merging(false))
        .expect("valid tracker config")
}

pub fn hit_energy(hits: &[Hit]) -> f64 {
    hits.iter().map(|h| h.energy).sum()
}

/// Cluster id of every tower as recorded by cluster membership lists.
///
/// Returns `Err` naming the first tower claimed twice.
pub fn tower_owners(reco: &Reconstruction) -> Result<Vec<Option<usize>>, String> {
    let mut owners = vec![None; reco.towers.len()];
    for cluster in &reco.clusters {
        for tower in &cluster.towers {
            let slot = owners
                .get_mut(tower.index())
                .ok_or_else(|| format!("cluster {} lists unknown tower {tower}", cluster.id))?;
            if let Some(previous) = slot.replace(cluster.id) {
                return Err(format!(
                    "tower {tower} in clusters {previous} and {}",
                    cluster.id
                ));
            }
        }
    }
    Ok(owners)
}

/// Check that every tower belongs to exactly one cluster and that tower
/// labels agree with membership lists.
pub fn check_partition(reco: &Reconstruction) -> Result<(), String> {
    let owners = tower_owners(reco)?;
    for (i, (owner, tower)) in owners.iter().zip(&reco.towers).enumerate() {
        if owner.is_none() {
            return Err(format!("tower #{i} belongs to no cluster"));
        }
        if *owner != tower.cluster {
            return Err(format!(
                "tower #{i} labeled {:?} but listed by {:?}",
                tower.cluster, owner
            ));
        }
    }
    Ok(())
}
