//! Clustering configuration.
//!
//! Provides [`ClusterConfig`] with the test-beam defaults: logarithmic
//! weighting with `w0 = 3.4` and the 9 mm / 36 mm merge window. The
//! configuration can be built programmatically or deserialized from any
//! serde source.

use lumi_core::constants::{
    LOG_WEIGHT_W0, MERGE_FAR_DISTANCE_MM, MERGE_NEAR_DISTANCE_MM, MERGE_RATIO_INTERCEPT,
    MERGE_RATIO_SLOPE,
};
use lumi_core::error::ConfigError;
use lumi_core::types::DetectorKind;
use serde::{Deserialize, Serialize};

/// Acceptance window of the cluster merger.
///
/// A pair merges when `distance < near_distance`, or when
/// `distance < far_distance` and the energy ratio is below
/// `ratio_intercept - ratio_slope * distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub near_distance: f64,
    pub far_distance: f64,
    pub ratio_intercept: f64,
    pub ratio_slope: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            near_distance: MERGE_NEAR_DISTANCE_MM,
            far_distance: MERGE_FAR_DISTANCE_MM,
            ratio_intercept: MERGE_RATIO_INTERCEPT,
            ratio_slope: MERGE_RATIO_SLOPE,
        }
    }
}

impl MergeConfig {
    /// Largest energy ratio accepted at `distance`.
    pub fn max_ratio(&self, distance: f64) -> f64 {
        self.ratio_intercept - self.ratio_slope * distance
    }

    /// Whether a cluster at `distance` with energy `ratio` relative to the
    /// survivor is absorbed.
    pub fn accepts(&self, distance: f64, ratio: f64) -> bool {
        distance < self.near_distance
            || (distance < self.far_distance && ratio < self.max_ratio(distance))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let params = [
            ("merge.near_distance", self.near_distance),
            ("merge.far_distance", self.far_distance),
            ("merge.ratio_intercept", self.ratio_intercept),
            ("merge.ratio_slope", self.ratio_slope),
        ];
        for (name, value) in params {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteParameter(name));
            }
        }
        if self.far_distance < self.near_distance {
            return Err(ConfigError::InvalidMergeWindow {
                near: self.near_distance,
                far: self.far_distance,
            });
        }
        if self.ratio_intercept < 0.0 || self.ratio_slope < 0.0 {
            return Err(ConfigError::InvalidRatioWindow {
                intercept: self.ratio_intercept,
                slope: self.ratio_slope,
            });
        }
        Ok(())
    }
}

/// Configuration for a [`ClusterEngine`](crate::ClusterEngine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Selects log-energy (calorimeter) or energy (tracker) weighting.
    pub detector: DetectorKind,
    /// Offset of the logarithmic weights.
    pub log_weight_w0: f64,
    /// Run the merge loop after building clusters.
    pub merging: bool,
    pub merge: MergeConfig,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            detector: DetectorKind::Calorimeter,
            log_weight_w0: LOG_WEIGHT_W0,
            merging: true,
            merge: MergeConfig::default(),
        }
    }
}

impl ClusterConfig {
    /// Defaults for the calorimeter layers.
    pub fn calorimeter() -> Self {
        Self::default()
    }

    /// Defaults for the tracker layers.
    pub fn tracker() -> Self {
        Self {
            detector: DetectorKind::Tracker,
            ..Self::default()
        }
    }

    pub fn with_merging(mut self, merging: bool) -> Self {
        self.merging = merging;
        self
    }

    pub fn with_log_weight_w0(mut self, w0: f64) -> Self {
        self.log_weight_w0 = w0;
        self
    }

    pub fn with_merge(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    /// Reject parameters the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.log_weight_w0.is_finite() {
            return Err(ConfigError::NonFiniteParameter("log_weight_w0"));
        }
        self.merge.validate()
    }
}
