//! Reconstruction data model: hits, towers, clusters.
//!
//! All collections are scoped to one event. Towers refer to each other
//! through [`TowerId`] handles into the event's tower vector, and clusters
//! hold the same handles for their member towers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::constants::FIRST_CALORIMETER_LAYER;
use crate::error::ConfigError;
use crate::geometry::{self, CellPosition};

/// Identifier of one reconstructed event.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Detector type. Selects the weighting policy of cluster positions.
///
/// # Examples
///
/// ```
/// use lumi_core::types::DetectorKind;
/// let kind: DetectorKind = "calorimeter".parse().unwrap();
/// assert_eq!(kind, DetectorKind::Calorimeter);
/// assert_eq!("Tracker".parse::<DetectorKind>().unwrap(), DetectorKind::Tracker);
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// Logarithmic energy weighting.
    #[default]
    #[serde(alias = "cal")]
    Calorimeter,
    /// Linear energy weighting.
    Tracker,
}

impl DetectorKind {
    /// Layers read out by this detector type in the test-beam setup.
    pub fn default_layers(&self) -> RangeInclusive<i32> {
        match self {
            Self::Tracker => 0..=FIRST_CALORIMETER_LAYER - 1,
            Self::Calorimeter => FIRST_CALORIMETER_LAYER..=i32::MAX,
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calorimeter => f.write_str("calorimeter"),
            Self::Tracker => f.write_str("tracker"),
        }
    }
}

impl FromStr for DetectorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "calorimeter" | "cal" => Ok(Self::Calorimeter),
            "tracker" => Ok(Self::Tracker),
            _ => Err(ConfigError::UnknownDetector(s.to_string())),
        }
    }
}

/// A detector cell in one layer, identified by sector and pad.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub sector: i32,
    pub pad: i32,
}

impl Cell {
    pub fn new(sector: i32, pad: i32) -> Self {
        Self { sector, pad }
    }

    /// Whether `other` lies in the 3×3 block centred on this cell.
    ///
    /// Every cell is adjacent to itself.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.sector.abs_diff(other.sector) <= 1 && self.pad.abs_diff(other.pad) <= 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.sector, self.pad)
    }
}

/// Coordinates a cluster position is computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Pad,
    Sector,
    Layer,
    Rho,
    X,
    Y,
}

impl Coordinate {
    /// Every weighted coordinate of a cluster, in reporting order.
    pub const ALL: [Coordinate; 6] = [
        Coordinate::Pad,
        Coordinate::Sector,
        Coordinate::Layer,
        Coordinate::Rho,
        Coordinate::X,
        Coordinate::Y,
    ];
}

/// One calibrated energy measurement at a detector cell.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub sector: i32,
    pub pad: i32,
    pub layer: i32,
    /// Calibrated energy in MIPs.
    pub energy: f64,
    pub x: f64,
    pub y: f64,
    pub rho: f64,
    pub phi: f64,
}

impl Hit {
    /// Create a hit whose continuous coordinates follow the detector geometry.
    pub fn new(sector: i32, pad: i32, layer: i32, energy: f64) -> Self {
        Self::with_coordinates(sector, pad, layer, energy, geometry::cell_position(sector, pad))
    }

    /// Create a hit with externally supplied continuous coordinates.
    pub fn with_coordinates(
        sector: i32,
        pad: i32,
        layer: i32,
        energy: f64,
        position: CellPosition,
    ) -> Self {
        Self {
            sector,
            pad,
            layer,
            energy,
            x: position.x,
            y: position.y,
            rho: position.rho,
            phi: position.phi,
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.sector, self.pad)
    }

    /// Value of one coordinate of this hit.
    pub fn coordinate(&self, coordinate: Coordinate) -> f64 {
        match coordinate {
            Coordinate::Pad => self.pad as f64,
            Coordinate::Sector => self.sector as f64,
            Coordinate::Layer => self.layer as f64,
            Coordinate::Rho => self.rho,
            Coordinate::X => self.x,
            Coordinate::Y => self.y,
        }
    }
}

/// Handle to a tower within one event's tower collection.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TowerId(pub usize);

impl TowerId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// All hits of one event sharing a `(sector, pad)` cell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tower {
    pub sector: i32,
    pub pad: i32,
    /// Sum of member-hit energies.
    pub energy: f64,
    pub hits: Vec<Hit>,
    /// Most energetic tower of the 3×3 neighborhood. `None` until resolved.
    pub neighbor: Option<TowerId>,
    /// Cluster id. `None` until labeled.
    pub cluster: Option<usize>,
}

impl Tower {
    /// Build a tower from hits that all sit on `cell`.
    pub fn from_hits(cell: Cell, hits: Vec<Hit>) -> Self {
        debug_assert!(hits.iter().all(|h| h.cell() == cell));
        let energy = hits.iter().map(|h| h.energy).sum();
        Self {
            sector: cell.sector,
            pad: cell.pad,
            energy,
            hits,
            neighbor: None,
            cluster: None,
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.sector, self.pad)
    }
}

/// A reconstructed energy deposit: a set of towers and all of their hits.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Rank by descending energy within the event (0 = most energetic).
    pub id: usize,
    pub hits: Vec<Hit>,
    pub towers: Vec<TowerId>,
    /// Sum of hit energies.
    pub energy: f64,
    /// Per-hit position weights, parallel to `hits`.
    pub weights: Vec<f64>,
    pub pad: f64,
    pub sector: f64,
    pub layer: f64,
    pub rho: f64,
    pub x: f64,
    pub y: f64,
    /// Number of hits, used as a cluster-size proxy.
    pub n_pads: usize,
}

impl Cluster {
    /// Weighted position along one coordinate.
    pub fn position(&self, coordinate: Coordinate) -> f64 {
        match coordinate {
            Coordinate::Pad => self.pad,
            Coordinate::Sector => self.sector,
            Coordinate::Layer => self.layer,
            Coordinate::Rho => self.rho,
            Coordinate::X => self.x,
            Coordinate::Y => self.y,
        }
    }

    /// Whether the weighted positions are real positions rather than the
    /// invalid-position sentinel.
    pub fn has_valid_position(&self) -> bool {
        self.weights.iter().sum::<f64>() != 0.0
    }
}

/// Output of one event's reconstruction.
///
/// `towers` is the event's tower collection with final cluster ids; every
/// [`TowerId`] held by a cluster indexes into it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Reconstruction {
    pub event: EventId,
    pub towers: Vec<Tower>,
    /// Final clusters sorted by descending energy.
    pub clusters: Vec<Cluster>,
}

impl Reconstruction {
    /// Total energy over all clusters.
    pub fn total_energy(&self) -> f64 {
        self.clusters.iter().map(|c| c.energy).sum()
    }
}
