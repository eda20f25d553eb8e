//! Error types for LumiCal cluster reconstruction.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("tower {tower} points to neighbor {neighbor} outside the event ({towers} towers)")] MalformedNeighborGraph { tower: usize, neighbor: usize, towers: usize },
    #[error("tower {tower} has no resolved neighbor")] MissingNeighbor { tower: usize },
    #[error("{count} towers never reached a local maximum")] UnresolvedTowers { count: usize },
    #[error("tower {tower} has no cluster id")] UnlabeledTower { tower: usize },
    #[error("cluster ids are not dense: expected {expected}, found {found}")] NonDenseClusterIds { expected: usize, found: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown detector type: {0}")] UnknownDetector(String),
    #[error("merge window: far distance {far} below near distance {near}")] InvalidMergeWindow { near: f64, far: f64 },
    #[error("ratio window: intercept {intercept} and slope {slope} must be non-negative")] InvalidRatioWindow { intercept: f64, slope: f64 },
    #[error("non-finite parameter: {0}")] NonFiniteParameter(&'static str),
}

#[derive(Error, Debug)]
pub enum LumiError {
    #[error(transparent)] Cluster(#[from] ClusterError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error("input: {0}")] Input(String),
}
