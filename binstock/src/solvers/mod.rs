use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Branch-and-bound for the Cutting Stock Problem
pub mod bnb;

/// Column generation for the Cutting Stock Problem
#[cfg(feature = "lp")]
pub mod colgen;

/// Subset-sum dynamic program over a single bin
pub mod dp;

/// First-Fit-Decreasing heuristic for the Bin Packing Problem
pub mod ffd;

/// Genetic algorithm for the Bin Packing Problem
pub mod genetic;

/// Knapsack-style dynamic program for cutting pieces out of a 2D sheet
pub mod knapsack_2d;

/// Exact mixed-integer formulation of the Bin Packing Problem
#[cfg(feature = "lp")]
pub mod milp;

/// The shape of the input a solver works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemShape {
    /// Items with a size and a bin capacity, see [`BPInstance`](crate::entities::BPInstance)
    BinPacking,
    /// Item types with a demand and a stock length, see [`CSInstance`](crate::entities::CSInstance)
    CuttingStock,
    /// Rectangular pieces and a sheet, see [`SheetInstance`](crate::entities::SheetInstance)
    Sheet,
}

/// Every solution strategy in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverKind {
    Milp,
    SubsetSumDp,
    BranchAndBound,
    ColumnGeneration,
    FirstFitDecreasing,
    Genetic,
    #[serde(rename = "knapsack-2d")]
    Knapsack2D,
}

impl SolverKind {
    pub const ALL: [SolverKind; 7] = [
        SolverKind::Milp,
        SolverKind::SubsetSumDp,
        SolverKind::BranchAndBound,
        SolverKind::ColumnGeneration,
        SolverKind::FirstFitDecreasing,
        SolverKind::Genetic,
        SolverKind::Knapsack2D,
    ];

    pub fn shape(&self) -> ProblemShape {
        match self {
            SolverKind::Milp
            | SolverKind::SubsetSumDp
            | SolverKind::FirstFitDecreasing
            | SolverKind::Genetic => ProblemShape::BinPacking,
            SolverKind::BranchAndBound | SolverKind::ColumnGeneration => {
                ProblemShape::CuttingStock
            }
            SolverKind::Knapsack2D => ProblemShape::Sheet,
        }
    }

    /// Whether the solver needs the `lp` feature
    pub fn requires_lp(&self) -> bool {
        matches!(self, SolverKind::Milp | SolverKind::ColumnGeneration)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SolverKind::Milp => "milp",
            SolverKind::SubsetSumDp => "subset-sum-dp",
            SolverKind::BranchAndBound => "branch-and-bound",
            SolverKind::ColumnGeneration => "column-generation",
            SolverKind::FirstFitDecreasing => "first-fit-decreasing",
            SolverKind::Genetic => "genetic",
            SolverKind::Knapsack2D => "knapsack-2d",
        }
    }
}

impl Display for SolverKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alias = match s.to_ascii_lowercase().as_str() {
            "dp" => "subset-sum-dp",
            "bnb" => "branch-and-bound",
            "cg" | "colgen" => "column-generation",
            "ffd" => "first-fit-decreasing",
            "ga" => "genetic",
            "k2d" => "knapsack-2d",
            _ => s,
        }
        .to_owned();
        SolverKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(&alias))
            .ok_or_else(|| {
                let names = SolverKind::ALL.map(|k| k.name()).join(", ");
                format!("unknown solver '{s}', expected one of: {names}")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ffd", SolverKind::FirstFitDecreasing)]
    #[test_case("bnb", SolverKind::BranchAndBound)]
    #[test_case("Column-Generation", SolverKind::ColumnGeneration)]
    #[test_case("knapsack-2d", SolverKind::Knapsack2D)]
    fn parse_solver_kind(input: &str, expected: SolverKind) {
        assert_eq!(input.parse::<SolverKind>(), Ok(expected));
    }

    #[test]
    fn names_round_trip() {
        for kind in SolverKind::ALL {
            assert_eq!(kind.name().parse::<SolverKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_solver() {
        assert!("simplex".parse::<SolverKind>().is_err());
    }
}
