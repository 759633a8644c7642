//! Exact assignment formulation of the Bin Packing Problem.
//!
//! ```text
//! min  sum_j y_j
//! s.t. sum_j x_ij = 1                      for every item i
//!      sum_i size_i * x_ij <= C * y_j      for every candidate bin j
//!      y_j >= y_{j+1}                      (optional symmetry breaking)
//!      x_ij, y_j binary
//! ```
//!
//! The model grows with `N * M` binaries and is exponential to solve in the worst case:
//! meant for instances with tens of items, not hundreds.

use std::time::{Duration, Instant};

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus, SolverModel,
    Variable, WithTimeLimit, microlp, variable,
};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::entities::{BPInstance, BPSolution, Bin, SolveStatus};
use crate::error::{Result, SolveError};
use crate::solvers::ffd;
use crate::util::MilpConfig;
use crate::util::assertions::{bins_partition_items, bins_within_capacity};

/// Solves the instance to optimality with a mixed-integer program.
///
/// First-Fit-Decreasing provides the incumbent. It is returned as optimal when it reaches the
/// trivial lower bound (if [`MilpConfig::lower_bound_shortcut`] is set), and tagged
/// [`SolveStatus::BudgetExhausted`] when the MILP does not finish within the time limit.
pub fn solve(instance: &BPInstance, config: &MilpConfig) -> Result<BPSolution> {
    instance.validate()?;
    let start = Instant::now();

    let incumbent = ffd::first_fit(instance, ffd::decreasing_order(instance));
    let lower_bound = instance.lower_bound();

    if instance.n_items() == 0
        || (config.lower_bound_shortcut && incumbent.len() == lower_bound)
    {
        info!(
            "[MILP] FFD reaches the lower bound of {lower_bound} bins, no model needed"
        );
        return Ok(BPSolution::new(incumbent, SolveStatus::Optimal));
    }

    let model = AssignmentModel {
        sizes: instance.sizes().collect_vec(),
        capacity: instance.capacity,
        n_bins: config.max_bins.unwrap_or(instance.n_items()),
        symmetry_breaking: config.symmetry_breaking,
    };
    debug!(
        "[MILP] model with {} items and {} candidate bins, FFD incumbent: {} bins",
        model.sizes.len(),
        model.n_bins,
        incumbent.len()
    );

    let time_limit = config.time_limit_ms.map(Duration::from_millis);
    let (bins, status) = match model.solve(time_limit)? {
        Some((bins, status)) if status.is_optimal() || bins.len() < incumbent.len() => {
            (bins, status)
        }
        _ => {
            warn!(
                "[MILP] time limit of {}ms exceeded, returning the FFD incumbent ({} bins)",
                config.time_limit_ms.unwrap_or_default(),
                incumbent.len()
            );
            return Ok(BPSolution::new(incumbent, SolveStatus::BudgetExhausted));
        }
    };

    if !bins_partition_items(instance, &bins) || !bins_within_capacity(instance, &bins) {
        return Err(SolveError::SolverFailure(
            "the MILP solution does not assign every item to exactly one bin within capacity"
                .into(),
        ));
    }

    info!(
        "[MILP] {status} solution with {} bins (lower bound: {lower_bound}, FFD: {}) in {:.3}ms",
        bins.len(),
        incumbent.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(BPSolution::new(bins, status))
}

struct AssignmentModel {
    sizes: Vec<u64>,
    capacity: u64,
    n_bins: usize,
    symmetry_breaking: bool,
}

impl AssignmentModel {
    /// Builds and solves the model. The engine stops itself once `time_limit` elapses:
    /// its incumbent is then tagged [`SolveStatus::BudgetExhausted`], and `None` is returned
    /// if it had not found any.
    fn solve(&self, time_limit: Option<Duration>) -> Result<Option<(Vec<Bin>, SolveStatus)>> {
        let n_items = self.sizes.len();
        let mut vars = ProblemVariables::new();

        let x: Vec<Vec<Variable>> = (0..n_items)
            .map(|i| {
                (0..self.n_bins)
                    .map(|j| vars.add(variable().binary().name(format!("x_{i}_{j}"))))
                    .collect_vec()
            })
            .collect_vec();
        let y: Vec<Variable> = (0..self.n_bins)
            .map(|j| vars.add(variable().binary().name(format!("y_{j}"))))
            .collect_vec();

        let objective = y.iter().fold(Expression::from(0.0), |acc, &yj| acc + yj);
        let mut problem = vars.minimise(objective).using(microlp);

        //every item in exactly one bin
        for xi in &x {
            let assigned = xi.iter().fold(Expression::from(0.0), |acc, &xij| acc + xij);
            problem.add_constraint(assigned.eq(1.0));
        }

        //capacity only available in used bins
        for (j, &yj) in y.iter().enumerate() {
            let load = x
                .iter()
                .zip(&self.sizes)
                .fold(Expression::from(0.0), |acc, (xi, &size)| {
                    acc + (size as f64) * xi[j]
                });
            problem.add_constraint(load.leq(self.capacity as f64 * yj));
        }

        if self.symmetry_breaking {
            for (&yj, &yk) in y.iter().tuple_windows() {
                problem.add_constraint((yk - yj).leq(0.0));
            }
        }

        if let Some(limit) = time_limit {
            problem = problem.with_time_limit(limit.as_secs_f64());
        }

        let solution = match problem.solve() {
            Ok(solution) => solution,
            //interrupted before a feasible assignment was found
            Err(ResolutionError::Other(_)) if time_limit.is_some() => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let status = match solution.status() {
            SolutionStatus::Optimal => SolveStatus::Optimal,
            SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::BudgetExhausted,
        };

        let bins = (0..self.n_bins)
            .filter_map(|j| {
                let item_ids = (0..n_items)
                    .filter(|&i| solution.value(x[i][j]) > 0.5)
                    .collect_vec();
                match item_ids.is_empty() {
                    true => None,
                    false => {
                        let load = item_ids.iter().map(|&i| self.sizes[i]).sum();
                        Some(Bin { item_ids, load })
                    }
                }
            })
            .collect_vec();

        Ok(Some((bins, status)))
    }
}
