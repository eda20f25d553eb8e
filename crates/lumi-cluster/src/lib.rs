//! # lumi-cluster: tower clustering engine.
//!
//! Reconstructs energy clusters from calibrated hits of one event:
//! - **Towers**: hits sharing a `(sector, pad)` cell are summed into a tower.
//! - **Neighbor chains**: every tower points to the most energetic tower of
//!   its 3×3 neighborhood; towers pointing to themselves seed clusters and
//!   every other tower inherits the id at the end of its chain.
//! - **Weighted clusters**: positions are log-energy weighted for the
//!   calorimeter and energy weighted for trackers.
//! - **Merging**: satellite clusters close in `y` with a small energy ratio
//!   are absorbed by the dominant cluster until no pair qualifies.
//!
//! Every event is independent; [`batch`] runs many of them in parallel.

pub mod batch;
pub mod builder;
pub mod config;
pub mod engine;
pub mod labeler;
pub mod merge;
pub mod neighbor;
pub mod observer;
pub mod summary;
pub mod tower;

pub use batch::{par_reconstruct_events, reconstruct_events, Event};
pub use config::{ClusterConfig, MergeConfig};
pub use engine::ClusterEngine;
pub use observer::TracingObserver;
pub use summary::{EventSummary, PairMetrics};
