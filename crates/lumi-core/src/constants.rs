//! Reconstruction constants. Lengths are in millimetres, energies in MIPs.

use std::f64::consts::PI;

/// Number of sectors in one detector layer.
pub const N_SECTORS: i32 = 4;

/// Number of pads in one sector.
pub const N_PADS: i32 = 64;

/// First layer read out as calorimeter; layers below it are trackers.
pub const FIRST_CALORIMETER_LAYER: i32 = 2;

/// Radius of the inner edge of pad 0 plus half a pad pitch.
pub const RHO_OFFSET_MM: f64 = 80.0 + 0.9;

/// Radial pad pitch.
pub const PAD_PITCH_MM: f64 = 1.8;

/// Azimuth of the centre of sector 0.
pub const PHI_OFFSET_RAD: f64 = PI / 2.0 + PI / 12.0 - PI / 48.0;

/// Azimuthal width of one sector.
pub const SECTOR_PITCH_RAD: f64 = PI / 24.0;

/// Offset of the logarithmic weighting scheme.
///
/// Hits carrying less than `exp(-W0)` of the cluster energy get weight 0.
///
/// # Examples
///
/// ```
/// use lumi_core::constants::LOG_WEIGHT_W0;
/// assert!((LOG_WEIGHT_W0 - 3.4).abs() < f64::EPSILON);
/// ```
pub const LOG_WEIGHT_W0: f64 = 3.4;

/// Position reported when every hit of a cluster has zero weight.
pub const INVALID_POSITION: f64 = -9999.0;

/// Clusters closer than this in `y` always merge.
pub const MERGE_NEAR_DISTANCE_MM: f64 = 9.0;

/// Clusters at or beyond this distance in `y` never merge.
pub const MERGE_FAR_DISTANCE_MM: f64 = 36.0;

/// Energy-ratio acceptance at zero distance.
pub const MERGE_RATIO_INTERCEPT: f64 = 0.1;

/// Decrease of the energy-ratio acceptance per millimetre of distance.
pub const MERGE_RATIO_SLOPE: f64 = 0.1 / 20.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_window_closes_before_far_distance() {
        // Acceptance reaches zero at 20 mm, well inside the 36 mm cut.
        let zero_at = MERGE_RATIO_INTERCEPT / MERGE_RATIO_SLOPE;
        assert!((zero_at - 20.0).abs() < 1e-9);
        assert!(zero_at < MERGE_FAR_DISTANCE_MM);
    }

    #[test]
    fn near_distance_below_far_distance() {
        assert!(MERGE_NEAR_DISTANCE_MM < MERGE_FAR_DISTANCE_MM);
    }

    #[test]
    fn invalid_position_outside_detector() {
        let max_rho = RHO_OFFSET_MM + PAD_PITCH_MM * N_PADS as f64;
        assert!(INVALID_POSITION < -max_rho);
    }
}
