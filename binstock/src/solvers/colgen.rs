//! Column generation for the one-dimensional Cutting Stock Problem.
//!
//! The restricted master problem selects pattern usages over a small pool of patterns:
//!
//! ```text
//! min  sum_j l_j
//! s.t. sum_j a_ij * l_j >= d_i    [pi_i]
//!      l_j >= 0
//! ```
//!
//! Its dual prices `pi` are obtained by solving the dual LP directly
//! (`max sum_i d_i * pi_i  s.t.  sum_i a_ij * pi_i <= 1, pi >= 0`).
//! The pricing problem is a bounded knapsack over the roll width. It proposes the pattern with
//! the most negative reduced cost `1 - sum_i pi_i * a_i`. Iteration stops when no pattern has
//! a negative reduced cost, at which point the relaxation is optimal.
//!
//! Turning the fractional usages into integers is a heuristic step, see [`Rounding`].

use std::time::Instant;

use good_lp::{
    Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, default_solver,
    variable,
};
use itertools::Itertools;
use log::{debug, info, warn};
use ndarray::Array2;

use crate::entities::{CSInstance, CSSolution, Pattern, SolveStatus};
use crate::error::{Result, SolveError};
use crate::solvers::dp::MAX_TABLE_CAPACITY;
use crate::solvers::ffd;
use crate::util::assertions::{patterns_within_stock, solution_covers_demand};
use crate::util::{ColGenConfig, Rounding};

/// Largest pricing table (chunks x capacity) that is allocated
const MAX_PRICING_CELLS: usize = 1 << 28;

/// Usages within this distance of an integer are considered integral
const INTEGRALITY_EPS: f64 = 1e-6;

/// Result of a column generation run.
#[derive(Debug, Clone)]
pub struct ColGenOutcome {
    pub solution: CSSolution,
    /// Number of pricing rounds performed
    pub iterations: usize,
    /// Whether pricing proved the relaxation optimal before the iteration cap
    pub converged: bool,
    /// Size of the final pattern pool
    pub n_patterns: usize,
}

/// Minimizes the number of stock rolls with column generation and a rounding step.
pub fn solve(instance: &CSInstance, config: &ColGenConfig) -> Result<ColGenOutcome> {
    instance.validate()?;
    let start = Instant::now();

    if instance.total_demand() == 0 {
        return Ok(ColGenOutcome {
            solution: CSSolution::new([], Some(0.0), SolveStatus::Optimal),
            iterations: 0,
            converged: true,
            n_patterns: 0,
        });
    }

    let pricer = Pricer::new(instance)?;

    let mut pool = (0..instance.n_types())
        .filter(|&t| instance.demand(t) > 0)
        .map(|t| Pattern::homogeneous(instance, t))
        .collect_vec();

    let mut iterations = 0;
    let mut converged = false;
    while iterations < config.max_iterations {
        iterations += 1;
        let (duals, dual_bound) = solve_dual(instance, &pool)?;
        let (pattern, value) = pricer.price(&duals);
        let reduced_cost = 1.0 - value;
        debug!(
            "[CG] iteration {iterations}: LP bound {dual_bound:.4}, best pattern {pattern} with reduced cost {reduced_cost:.6}"
        );

        if reduced_cost >= -config.reduced_cost_tolerance {
            converged = true;
            break;
        }
        if pool.contains(&pattern) {
            warn!("[CG] pricing returned pattern {pattern} which is already in the pool, stopping");
            break;
        }
        pool.push(pattern);
    }
    if !converged {
        warn!(
            "[CG] no convergence after {iterations} iterations, the LP bound is not proven"
        );
    }

    let (usages, lp_bound) = solve_master(instance, &pool)?;

    let patterns = match config.rounding {
        Rounding::Ceil => pool
            .iter()
            .cloned()
            .zip(usages.iter().map(|&u| (u - INTEGRALITY_EPS).ceil().max(0.0) as u64))
            .collect_vec(),
        Rounding::Residual => round_residual(instance, &pool, &usages)?,
    };

    let total_rolls = patterns.iter().map(|(_, usage)| usage).sum::<u64>();
    let status = match converged && total_rolls as f64 <= (lp_bound - INTEGRALITY_EPS).ceil() {
        true => SolveStatus::Optimal,
        false => SolveStatus::Heuristic,
    };
    let solution = CSSolution::new(patterns, Some(lp_bound), status);

    debug_assert!(patterns_within_stock(instance, &solution));
    if !solution_covers_demand(instance, &solution) {
        return Err(SolveError::SolverFailure(
            "rounded pattern usages do not cover the demand".into(),
        ));
    }

    info!(
        "[CG] {} rolls ({status}) with LP bound {lp_bound:.3}, {} patterns generated in {iterations} iterations, {:.3}ms",
        solution.total_rolls(),
        pool.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ColGenOutcome {
        solution,
        iterations,
        converged,
        n_patterns: pool.len(),
    })
}

/// Solves the restricted master LP, returning the usage of every pattern and the objective value.
fn solve_master(instance: &CSInstance, pool: &[Pattern]) -> Result<(Vec<f64>, f64)> {
    let mut vars = ProblemVariables::new();
    let lambdas: Vec<Variable> = (0..pool.len())
        .map(|j| vars.add(variable().min(0.0).name(format!("l_{j}"))))
        .collect_vec();
    let objective = lambdas
        .iter()
        .fold(Expression::from(0.0), |acc, &l| acc + l);
    let mut problem = vars.minimise(objective).using(default_solver);

    for t in (0..instance.n_types()).filter(|&t| instance.demand(t) > 0) {
        let produced = pool
            .iter()
            .zip(&lambdas)
            .fold(Expression::from(0.0), |acc, (p, &l)| {
                acc + (p.counts[t] as f64) * l
            });
        let demand = instance.demand(t) as f64;
        problem.add_constraint(constraint!(produced >= demand));
    }

    let solution = problem.solve()?;
    let usages = lambdas.iter().map(|&l| solution.value(l)).collect_vec();
    let objective = usages.iter().sum();
    Ok((usages, objective))
}

/// Solves the dual of the restricted master LP, returning the price of every item type and the objective value.
fn solve_dual(instance: &CSInstance, pool: &[Pattern]) -> Result<(Vec<f64>, f64)> {
    let mut vars = ProblemVariables::new();
    let prices: Vec<Variable> = (0..instance.n_types())
        .map(|t| vars.add(variable().min(0.0).name(format!("pi_{t}"))))
        .collect_vec();
    let objective = prices
        .iter()
        .enumerate()
        .fold(Expression::from(0.0), |acc, (t, &pi)| {
            acc + (instance.demand(t) as f64) * pi
        });
    let mut problem = vars.maximise(objective).using(default_solver);

    for pattern in pool {
        let value = pattern
            .counts
            .iter()
            .zip(&prices)
            .fold(Expression::from(0.0), |acc, (&count, &pi)| {
                acc + (count as f64) * pi
            });
        problem.add_constraint(value.leq(1.0));
    }

    let solution = problem.solve()?;
    let duals = prices.iter().map(|&pi| solution.value(pi)).collect_vec();
    let objective = duals
        .iter()
        .enumerate()
        .map(|(t, pi)| instance.demand(t) as f64 * pi)
        .sum();
    Ok((duals, objective))
}

/// Rounds the usages down and covers the remaining demand with First-Fit-Decreasing patterns.
fn round_residual(
    instance: &CSInstance,
    pool: &[Pattern],
    usages: &[f64],
) -> Result<Vec<(Pattern, u64)>> {
    let mut patterns = pool
        .iter()
        .cloned()
        .zip(usages.iter().map(|&u| (u + INTEGRALITY_EPS).floor().max(0.0) as u64))
        .collect_vec();

    let produced = CSSolution::new(patterns.clone(), None, SolveStatus::Heuristic)
        .produced(instance.n_types());
    let residual_demand = instance
        .demands()
        .zip(&produced)
        .map(|(demand, &p)| demand.saturating_sub(p))
        .collect_vec();

    let lengths = instance.items.iter().map(|(item, _)| item.size).collect_vec();
    let residual = CSInstance::new(&lengths, &residual_demand, instance.stock_length)?;
    let units = residual.units();
    let expanded = residual.expand();
    let bins = ffd::first_fit(&expanded, ffd::decreasing_order(&expanded));
    debug!(
        "[CG] {} residual units packed into {} extra rolls",
        units.len(),
        bins.len()
    );

    patterns.extend(bins.iter().map(|b| {
        let cuts = b.item_ids.iter().map(|&unit| units[unit]);
        (Pattern::from_cuts(instance.n_types(), cuts), 1)
    }));
    Ok(patterns)
}

/// Bounded knapsack over the roll width, with every item type split into binary chunks
/// (1, 2, 4, ... units) so that a 0/1 dynamic program can be used.
struct Pricer {
    capacity: usize,
    /// (item type, number of units, total length)
    chunks: Vec<(usize, u64, usize)>,
}

impl Pricer {
    fn new(instance: &CSInstance) -> Result<Self> {
        if instance.stock_length > MAX_TABLE_CAPACITY {
            return Err(SolveError::InvalidInstance(format!(
                "stock length {} is too large for the pricing table",
                instance.stock_length
            )));
        }
        let mut chunks = vec![];
        for (item, demand) in &instance.items {
            let mut bound = (*demand).min(instance.stock_length / item.size);
            let mut chunk = 1;
            while bound > 0 {
                let units = chunk.min(bound);
                chunks.push((item.id, units, (units * item.size) as usize));
                bound -= units;
                chunk *= 2;
            }
        }
        let capacity = instance.stock_length as usize;
        if chunks.len() * (capacity + 1) > MAX_PRICING_CELLS {
            return Err(SolveError::InvalidInstance(
                "the pricing table would be too large".into(),
            ));
        }
        Ok(Self {
            capacity,
            chunks,
        })
    }

    /// Pattern maximising the total dual price, and that price.
    fn price(&self, duals: &[f64]) -> (Pattern, f64) {
        let mut best = vec![0.0; self.capacity + 1];
        let mut taken = Array2::<bool>::default((self.chunks.len(), self.capacity + 1));

        for (k, &(type_id, units, length)) in self.chunks.iter().enumerate() {
            let value = duals[type_id] * units as f64;
            if value <= 0.0 {
                continue;
            }
            for c in (length..=self.capacity).rev() {
                let candidate = best[c - length] + value;
                if candidate > best[c] + f64::EPSILON {
                    best[c] = candidate;
                    taken[[k, c]] = true;
                }
            }
        }

        let mut pattern = Pattern::empty(duals.len());
        let mut c = self.capacity;
        for (k, &(type_id, units, length)) in self.chunks.iter().enumerate().rev() {
            if taken[[k, c]] {
                pattern.counts[type_id] += units;
                c -= length;
            }
        }
        (pattern, best[self.capacity])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn pricing_respects_width_and_demand() {
        let instance = CSInstance::new(&[45, 36, 31, 14], &[97, 610, 395, 211], 100).unwrap();
        let pricer = Pricer::new(&instance).unwrap();
        let (pattern, value) = pricer.price(&[0.5, 0.5, 0.25, 0.125]);
        assert!(pattern.fits(&instance));
        assert!(approx_eq!(f64, value, 1.25, epsilon = 1e-9), "{value}");
        // {45, 36, 14} is worth 1.125, {36, 36, 14, 14} fills the roll exactly for 1.25
        assert_eq!(pattern.counts, vec![0, 2, 0, 2]);
    }

    #[test]
    fn pricing_caps_units_by_demand() {
        let instance = CSInstance::new(&[10], &[3], 100).unwrap();
        let (pattern, _) = Pricer::new(&instance).unwrap().price(&[1.0]);
        assert_eq!(pattern.counts, vec![3]);
    }

    #[test]
    fn classic_instance_covers_demand() {
        let instance = CSInstance::new(&[45, 36, 31, 14], &[97, 610, 395, 211], 100).unwrap();
        let outcome = solve(&instance, &ColGenConfig::default()).unwrap();
        let solution = &outcome.solution;
        assert!(solution_covers_demand(&instance, solution));
        let lp_bound = solution.lp_bound.unwrap();
        assert!(solution.total_rolls() as f64 >= lp_bound - 1e-6);
        assert!(solution.total_rolls() >= instance.lower_bound());
    }

    #[test]
    fn ceil_rounding_covers_demand() {
        let instance = CSInstance::new(&[6, 5, 4, 3, 2], &[7, 3, 9, 4, 5], 12).unwrap();
        let config = ColGenConfig {
            rounding: Rounding::Ceil,
            ..Default::default()
        };
        let outcome = solve(&instance, &config).unwrap();
        assert!(solution_covers_demand(&instance, &outcome.solution));
    }

    #[test]
    fn oversized_type() {
        let instance = CSInstance::new(&[150], &[1], 100).unwrap();
        assert_eq!(
            solve(&instance, &ColGenConfig::default()).unwrap_err(),
            SolveError::ItemExceedsCapacity {
                id: 0,
                size: 150,
                capacity: 100
            }
        );
    }
}
