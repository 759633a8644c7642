use binstock::io::ext_repr::{
    ExtBPInstance, ExtBPSolution, ExtCSInstance, ExtCSSolution, ExtSheetInstance,
    ExtSheetSolution,
};
use binstock::solvers::SolverKind;
use serde::{Deserialize, Serialize};

use crate::config::DriverConfig;

#[derive(Serialize, Deserialize, Clone)]
pub struct BPOutput {
    #[serde(flatten)]
    pub instance: ExtBPInstance,
    pub solver: SolverKind,
    pub solution: ExtBPSolution,
    pub config: DriverConfig,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct CSOutput {
    #[serde(flatten)]
    pub instance: ExtCSInstance,
    pub solver: SolverKind,
    pub solution: ExtCSSolution,
    pub config: DriverConfig,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SheetOutput {
    #[serde(flatten)]
    pub instance: ExtSheetInstance,
    pub solution: ExtSheetSolution,
}

/// Result of the subset-sum dynamic program, which does not produce a packing
#[derive(Serialize, Deserialize, Clone)]
pub struct SubsetSumOutput {
    #[serde(flatten)]
    pub instance: ExtBPInstance,
    /// Minimum number of items filling one bin exactly, `None` if no subset does
    pub min_items: Option<usize>,
    /// Largest sum that can be formed without exceeding the capacity
    pub max_reachable: usize,
}
