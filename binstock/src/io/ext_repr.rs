use serde::{Deserialize, Serialize};

use crate::entities::SolveStatus;

/// Bin Packing Problem instance
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtBPInstance {
    /// The name of the instance
    pub name: String,
    /// Capacity shared by all bins
    pub capacity: i64,
    /// Set of items to be packed
    pub items: Vec<ExtItem>,
}

/// Item with a one-dimensional size
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtItem {
    /// Unique identifier of the item, consecutive from 0
    pub id: u64,
    pub size: i64,
}

/// Cutting Stock Problem instance
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtCSInstance {
    /// The name of the instance
    pub name: String,
    /// Length of every stock roll
    pub stock_length: i64,
    /// Item types to be cut
    pub items: Vec<ExtDemandItem>,
}

/// Item type with a demand
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtDemandItem {
    /// Unique identifier of the item type, consecutive from 0
    pub id: u64,
    pub length: i64,
    /// Amount of times this item has to be produced
    pub demand: u64,
}

/// Sheet cutting instance
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSheetInstance {
    /// The name of the instance
    pub name: String,
    pub width: i64,
    pub height: i64,
    /// Rectangular pieces that can be cut from the sheet
    pub pieces: Vec<ExtPiece>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPiece {
    /// Unique identifier of the piece, consecutive from 0
    pub id: u64,
    pub width: i64,
    pub height: i64,
}

/// Bin Packing Problem solution
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtBPSolution {
    pub n_bins: usize,
    /// Trivial lower bound on the number of bins
    pub lower_bound: usize,
    pub bins: Vec<ExtBin>,
    /// Sum of the item sizes divided by the total capacity of the used bins
    pub density: f32,
    pub status: SolveStatus,
    /// The time it took to generate the solution in seconds
    pub run_time_sec: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtBin {
    pub item_ids: Vec<usize>,
    pub load: u64,
}

/// Cutting Stock Problem solution
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtCSSolution {
    pub total_rolls: u64,
    /// Objective value of the linear relaxation, if one was solved
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lp_bound: Option<f64>,
    pub patterns: Vec<ExtPattern>,
    /// Total unused length over all rolls
    pub waste: u64,
    pub status: SolveStatus,
    /// The time it took to generate the solution in seconds
    pub run_time_sec: f64,
}

/// A cutting pattern and the number of rolls cut according to it
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPattern {
    /// Units cut per item type
    pub counts: Vec<u64>,
    pub usage: u64,
    /// Unused length of a single roll cut with this pattern
    pub waste: u64,
}

/// Sheet cutting solution
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSheetSolution {
    pub n_pieces: usize,
    pub placements: Vec<ExtPlacement>,
    /// Fraction of the sheet covered by pieces
    pub density: f32,
    /// The time it took to generate the solution in seconds
    pub run_time_sec: f64,
}

/// A piece placed with its bottom-left corner at `(x, y)`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtPlacement {
    pub piece_id: usize,
    pub x: u64,
    pub y: u64,
}
