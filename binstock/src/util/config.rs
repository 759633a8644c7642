use serde::{Deserialize, Serialize};

///Configuration of the exact MILP bin packing solver
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct MilpConfig {
    ///Number of candidate bins in the model, if undefined one bin per item is provided
    pub max_bins: Option<usize>,
    ///Adds `y[j] >= y[j+1]` so that used bins are always the first ones
    pub symmetry_breaking: bool,
    ///Skips the MILP when First-Fit-Decreasing already reaches the trivial lower bound
    pub lower_bound_shortcut: bool,
    ///Wall-clock budget handed to the MILP engine, which stops on its own once it elapses.
    ///The best of its incumbent and First-Fit-Decreasing is then returned as budget exhausted.
    pub time_limit_ms: Option<u64>,
}

impl Default for MilpConfig {
    fn default() -> Self {
        Self {
            max_bins: None,
            symmetry_breaking: true,
            lower_bound_shortcut: true,
            time_limit_ms: Some(60_000),
        }
    }
}

///Configuration of the branch-and-bound cutting stock solver
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(default)]
pub struct BnBConfig {
    ///Known upper bound on the number of stock pieces.
    ///The search only looks for strictly better plans, if undefined First-Fit-Decreasing provides one
    pub upper_bound: Option<u64>,
    ///Maximum number of search nodes to visit
    pub node_limit: Option<u64>,
    ///Wall-clock budget of the search
    pub time_limit_ms: Option<u64>,
}

///How the fractional pattern usages of the column generation are turned into integers
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Rounding {
    ///Every fractional usage is rounded up
    Ceil,
    ///Usages are rounded down and the uncovered demand is packed with First-Fit-Decreasing
    #[default]
    Residual,
}

///Configuration of the column generation cutting stock solver
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ColGenConfig {
    ///Maximum number of pricing rounds
    pub max_iterations: usize,
    ///A pattern is only added if its reduced cost is below `-reduced_cost_tolerance`
    pub reduced_cost_tolerance: f64,
    pub rounding: Rounding,
}

impl Default for ColGenConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            reduced_cost_tolerance: 1e-6,
            rounding: Rounding::default(),
        }
    }
}

///Configuration of the genetic bin packing heuristic
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct GAConfig {
    pub population_size: usize,
    pub generations: usize,
    ///Number of best individuals copied unchanged into the next generation
    pub elite_count: usize,
    ///Parents for crossover are drawn from this many best individuals
    pub parent_pool: usize,
    ///Probability of producing offspring through crossover instead of mutation only
    pub crossover_rate: f64,
    ///Stops early after this many generations without improvement, if defined
    pub stagnation_limit: Option<usize>,
    ///Wall-clock budget of the evolution
    pub time_limit_ms: Option<u64>,
}

impl Default for GAConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 1000,
            elite_count: 10,
            parent_pool: 50,
            crossover_rate: 0.7,
            stagnation_limit: None,
            time_limit_ms: None,
        }
    }
}
