//! Detector geometry: continuous coordinates of a `(sector, pad)` cell.
//!
//! Pads are concentric strips; `rho` grows with the pad number and `phi`
//! decreases with the sector number. `x`/`y` are the Cartesian projection.

use serde::{Deserialize, Serialize};

use crate::constants::{PAD_PITCH_MM, PHI_OFFSET_RAD, RHO_OFFSET_MM, SECTOR_PITCH_RAD};

/// Continuous coordinates of a cell centre.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct CellPosition {
    pub rho: f64,
    pub phi: f64,
    pub x: f64,
    pub y: f64,
}

impl CellPosition {
    /// Position from polar coordinates.
    pub fn from_polar(rho: f64, phi: f64) -> Self {
        Self {
            rho,
            phi,
            x: rho * phi.cos(),
            y: rho * phi.sin(),
        }
    }
}

/// Radius of the centre of `pad`.
pub fn pad_rho(pad: i32) -> f64 {
    RHO_OFFSET_MM + PAD_PITCH_MM * pad as f64
}

/// Azimuth of the centre of `sector`.
pub fn sector_phi(sector: i32) -> f64 {
    PHI_OFFSET_RAD - SECTOR_PITCH_RAD * sector as f64
}

/// Centre of the `(sector, pad)` cell.
pub fn cell_position(sector: i32, pad: i32) -> CellPosition {
    CellPosition::from_polar(pad_rho(pad), sector_phi(sector))
}
