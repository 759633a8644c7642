use std::fmt::{Display, Formatter};
use std::time::Instant;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::entities::{BPInstance, CSInstance, Pattern, SheetInstance};

/// How much trust can be put in the objective value of a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The objective value is proven to be optimal
    Optimal,
    /// The search was cut short by its time or node budget.
    /// The solution is the best one found so far, not proven optimal.
    BudgetExhausted,
    /// Produced by a heuristic, no claim about optimality
    Heuristic,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::BudgetExhausted => write!(f, "budget exhausted"),
            SolveStatus::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// A single bin and the ids of the items packed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    pub item_ids: Vec<usize>,
    /// Sum of the sizes of the packed items
    pub load: u64,
}

impl Bin {
    pub fn with_item(item_id: usize, size: u64) -> Self {
        Self {
            item_ids: vec![item_id],
            load: size,
        }
    }

    pub fn push(&mut self, item_id: usize, size: u64) {
        self.item_ids.push(item_id);
        self.load += size;
    }
}

/// Partition of the items of a [`BPInstance`] into bins.
#[derive(Debug, Clone)]
pub struct BPSolution {
    pub bins: Vec<Bin>,
    pub status: SolveStatus,
    /// Instant the solution was created
    pub time_stamp: Instant,
}

impl BPSolution {
    pub fn new(bins: Vec<Bin>, status: SolveStatus) -> Self {
        Self {
            bins,
            status,
            time_stamp: Instant::now(),
        }
    }

    pub fn n_bins(&self) -> usize {
        self.bins.len()
    }

    /// Total size of the packed items divided by the total capacity of the used bins
    pub fn density(&self, instance: &BPInstance) -> f32 {
        match self.bins.is_empty() {
            true => 0.0,
            false => {
                let packed = self.bins.iter().map(|b| b.load).sum::<u64>();
                packed as f32 / (self.n_bins() as u64 * instance.capacity) as f32
            }
        }
    }

    /// Bins as sequences of item sizes
    pub fn bin_sizes(&self, instance: &BPInstance) -> Vec<Vec<u64>> {
        self.bins
            .iter()
            .map(|b| b.item_ids.iter().map(|&id| instance.size(id)).collect_vec())
            .collect_vec()
    }
}

/// Usage counts of cutting patterns for a [`CSInstance`].
#[derive(Debug, Clone)]
pub struct CSSolution {
    /// Distinct patterns and how many rolls are cut according to each of them
    pub patterns: Vec<(Pattern, u64)>,
    /// Objective value of the linear relaxation, if one was solved
    pub lp_bound: Option<f64>,
    pub status: SolveStatus,
    /// Instant the solution was created
    pub time_stamp: Instant,
}

impl CSSolution {
    /// Creates a solution, merging identical patterns and dropping unused or empty ones.
    pub fn new(
        patterns: impl IntoIterator<Item = (Pattern, u64)>,
        lp_bound: Option<f64>,
        status: SolveStatus,
    ) -> Self {
        let mut merged: Vec<(Pattern, u64)> = vec![];
        for (pattern, usage) in patterns {
            if usage == 0 || pattern.is_empty() {
                continue;
            }
            match merged.iter_mut().find(|(p, _)| *p == pattern) {
                Some((_, u)) => *u += usage,
                None => merged.push((pattern, usage)),
            }
        }
        Self {
            patterns: merged,
            lp_bound,
            status,
            time_stamp: Instant::now(),
        }
    }

    /// Number of stock rolls consumed
    pub fn total_rolls(&self) -> u64 {
        self.patterns.iter().map(|(_, usage)| usage).sum()
    }

    /// Number of units produced of every item type
    pub fn produced(&self, n_types: usize) -> Vec<u64> {
        let mut produced = vec![0; n_types];
        for (pattern, usage) in &self.patterns {
            for (type_id, count) in pattern.counts.iter().enumerate() {
                produced[type_id] += count * usage;
            }
        }
        produced
    }

    /// Total unused length over all rolls
    pub fn waste(&self, instance: &CSInstance) -> u64 {
        self.patterns
            .iter()
            .map(|(pattern, usage)| pattern.waste(instance) * usage)
            .sum()
    }
}

/// Position of a piece cut from a sheet, `(x, y)` is its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetPlacement {
    pub piece_id: usize,
    pub x: u64,
    pub y: u64,
}

/// Pieces cut from a single sheet of a [`SheetInstance`].
#[derive(Debug, Clone)]
pub struct SheetSolution {
    pub placements: Vec<SheetPlacement>,
    pub time_stamp: Instant,
}

impl SheetSolution {
    pub fn new(placements: Vec<SheetPlacement>) -> Self {
        Self {
            placements,
            time_stamp: Instant::now(),
        }
    }

    pub fn n_pieces(&self) -> usize {
        self.placements.len()
    }

    /// Fraction of the sheet covered by the cut pieces
    pub fn density(&self, instance: &SheetInstance) -> f32 {
        let used = self
            .placements
            .iter()
            .map(|p| instance.pieces[p.piece_id].area())
            .sum::<u64>();
        used as f32 / instance.area() as f32
    }
}
