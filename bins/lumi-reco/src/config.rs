//! Reconstruction run configuration.
//!
//! Provides [`RecoConfig`], layered in this order (later wins):
//! 1. built-in defaults
//! 2. an optional TOML file passed with `--config`
//! 3. environment variables prefixed `LUMI_`, nested with `__`
//!    (`LUMI_CLUSTER__MERGING=false`, `LUMI_PROGRESS_EVERY=1000`)
//! 4. command-line flags, applied by `main`

use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use lumi_cluster::ClusterConfig;
use serde::{Deserialize, Serialize};

/// Events between two progress log lines.
pub const DEFAULT_PROGRESS_EVERY: u64 = 300;

/// Inclusive range of detector layers kept before reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRange {
    pub first: i32,
    pub last: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoConfig {
    pub cluster: ClusterConfig,
    /// Log filter string (e.g. "info", "lumi_cluster=debug").
    pub log_level: String,
    /// "text" or "json".
    pub log_format: String,
    /// Log progress every this many events; 0 disables progress lines.
    pub progress_every: u64,
    /// Reconstruct events on the rayon pool.
    pub parallel: bool,
    /// Layers to keep. Falls back to the detector's own layers.
    pub layers: Option<LayerRange>,
}

impl Default for RecoConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            parallel: true,
            layers: None,
        }
    }
}

impl RecoConfig {
    /// Load defaults, then `path` if given, then `LUMI_*` variables.
    ///
    /// Not validated: command-line flags may still override bad values, so
    /// callers run [`validate`](Self::validate) after the last layer.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("LUMI")
                .separator("__")
                .try_parsing(true),
        );

        let config: RecoConfig = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.cluster
            .validate()
            .context("invalid cluster configuration")?;
        if let Some(layers) = self.layers {
            anyhow::ensure!(
                layers.first <= layers.last,
                "empty layer range {}..={}",
                layers.first,
                layers.last
            );
        }
        anyhow::ensure!(
            matches!(self.log_format.as_str(), "text" | "json"),
            "unknown log format {:?}",
            self.log_format
        );
        Ok(())
    }

    /// Layers kept before reconstruction.
    pub fn layer_range(&self) -> RangeInclusive<i32> {
        match self.layers {
            Some(layers) => layers.first..=layers.last,
            None => self.cluster.detector.default_layers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumi_core::types::DetectorKind;
    use std::io::Write;

    fn write_toml(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reco.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults() {
        let cfg = RecoConfig::default();
        assert_eq!(cfg.progress_every, 300);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.parallel);
        assert!(cfg.cluster.merging);
        assert_eq!(cfg.layer_range(), 2..=i32::MAX);
    }

    #[test]
    fn file_overrides_defaults() {
        let (_dir, path) = write_toml(
            r#"
            progress_every = 50
            parallel = false

            [cluster]
            detector = "tracker"
            merging = false

            [cluster.merge]
            near_distance = 5.0
            "#,
        );
        let cfg = RecoConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(cfg.progress_every, 50);
        assert!(!cfg.parallel);
        assert_eq!(cfg.cluster.detector, DetectorKind::Tracker);
        assert!(!cfg.cluster.merging);
        assert_eq!(cfg.cluster.merge.near_distance, 5.0);
        assert_eq!(cfg.cluster.merge.far_distance, 36.0);
        assert_eq!(cfg.layer_range(), 0..=1);
    }

    #[test]
    fn explicit_layers_win_over_detector() {
        let (_dir, path) = write_toml(
            r#"
            [layers]
            first = 3
            last = 10
            "#,
        );
        let cfg = RecoConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(cfg.layer_range(), 3..=10);
        assert_eq!(cfg.layers, Some(LayerRange { first: 3, last: 10 }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RecoConfig::load(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn invalid_merge_window_loads_but_fails_validation() {
        let (_dir, path) = write_toml(
            r#"
            [cluster.merge]
            near_distance = 40.0
            far_distance = 10.0
            "#,
        );
        let cfg = RecoConfig::load(Some(path.as_path())).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_layer_range_rejected() {
        let cfg = RecoConfig {
            layers: Some(LayerRange { first: 5, last: 4 }),
            ..RecoConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_log_format_rejected() {
        let cfg = RecoConfig {
            log_format: "xml".to_string(),
            ..RecoConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
