//! Depth-first branch-and-bound for the one-dimensional Cutting Stock Problem.
//!
//! Stock pieces are filled one at a time. At every node one unit of a length with remaining
//! demand is cut from the current piece, demand is decremented in place and restored on backtrack.
//! Lengths within a piece are cut in non-increasing order, and a new piece is only opened
//! once nothing left fits in the current one: there is always an optimal plan of that form.
//!
//! A running upper bound (the best plan so far) prunes every node whose lower bound,
//! `pieces + ceil((remaining length - free length) / stock length)`, cannot improve on it.

use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};
use thousands::Separable;

use crate::entities::{CSInstance, CSSolution, Pattern, SolveStatus};
use crate::error::{Result, SolveError};
use crate::solvers::ffd;
use crate::util::assertions::{patterns_within_stock, solution_covers_demand};
use crate::util::{BnBConfig, Budget};

/// Result of a branch-and-bound run.
#[derive(Debug, Clone)]
pub struct BnBOutcome {
    pub solution: CSSolution,
    /// Number of search nodes visited
    pub nodes: u64,
    /// Number of times the search improved on the incumbent
    pub improvements: usize,
}

/// Finds the minimum number of stock pieces whose cuts satisfy all demand.
///
/// The initial incumbent comes from First-Fit-Decreasing over the expanded demand.
/// If [`BnBConfig::upper_bound`] is defined, only plans using at most that many pieces are accepted.
pub fn solve(instance: &CSInstance, config: &BnBConfig) -> Result<BnBOutcome> {
    instance.validate()?;
    let start = Instant::now();

    if instance.total_demand() == 0 {
        return Ok(BnBOutcome {
            solution: CSSolution::new([], None, SolveStatus::Optimal),
            nodes: 0,
            improvements: 0,
        });
    }

    let mut search = Search::new(instance, config);
    search.run();

    let status = match search.budget.is_exhausted() {
        true => SolveStatus::BudgetExhausted,
        false => SolveStatus::Optimal,
    };

    let Some(plan) = search.best_plan.take() else {
        return Err(SolveError::Infeasible(format!(
            "no cutting plan uses at most {} stock pieces",
            search.best - 1
        )));
    };

    let patterns = search
        .assign_types(&plan)
        .into_iter()
        .map(|cuts| (Pattern::from_cuts(instance.n_types(), cuts), 1));
    let solution = CSSolution::new(patterns, None, status);

    debug_assert!(patterns_within_stock(instance, &solution));
    debug_assert!(solution_covers_demand(instance, &solution));

    info!(
        "[BNB] {} stock pieces ({}) after {} nodes and {} improvements in {:.3}ms",
        solution.total_rolls(),
        status,
        search.budget.nodes().separate_with_commas(),
        search.improvements,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(BnBOutcome {
        solution,
        nodes: search.budget.nodes(),
        improvements: search.improvements,
    })
}

#[derive(Debug, Clone, Copy)]
enum Cut {
    Unit(usize),
    NewPiece,
}

/// A node on the current search path.
#[derive(Debug, Clone, Copy)]
struct Frame {
    pieces: u64,
    /// Free length left in the current piece
    free: u64,
    next_group: usize,
    /// Whether the new piece branch was considered
    closed: bool,
}

impl Frame {
    fn new(pieces: u64, free: u64, min_group: usize) -> Self {
        Self {
            pieces,
            free,
            next_group: min_group,
            closed: false,
        }
    }
}

/// Search state. Item types of equal length are merged into groups,
/// cutting one unit of either is interchangeable.
struct Search<'a> {
    instance: &'a CSInstance,
    stock: u64,
    /// Distinct lengths, in decreasing order
    lengths: Vec<u64>,
    /// Remaining demand per group
    demand: Vec<u64>,
    /// Item types belonging to each group
    group_types: Vec<Vec<usize>>,
    /// Total length of the remaining demand
    remaining: u64,
    path: Vec<Cut>,
    /// Number of pieces of the incumbent, every accepted plan uses strictly fewer
    best: u64,
    best_plan: Option<Vec<Vec<usize>>>,
    improvements: usize,
    budget: Budget,
}

impl<'a> Search<'a> {
    fn new(instance: &'a CSInstance, config: &BnBConfig) -> Self {
        let groups = instance
            .items
            .iter()
            .filter(|(_, demand)| *demand > 0)
            .map(|(item, _)| item)
            .sorted_by_key(|item| std::cmp::Reverse(item.size))
            .chunk_by(|item| item.size);

        let (mut lengths, mut demand, mut group_types) = (vec![], vec![], vec![]);
        for (length, items) in &groups {
            let types = items.map(|item| item.id).collect_vec();
            lengths.push(length);
            demand.push(types.iter().map(|&t| instance.demand(t)).sum());
            group_types.push(types);
        }

        let mut search = Self {
            instance,
            stock: instance.stock_length,
            lengths,
            demand,
            group_types,
            remaining: instance.total_length(),
            path: vec![],
            best: u64::MAX,
            best_plan: None,
            improvements: 0,
            budget: Budget::new(config.time_limit_ms, config.node_limit),
        };
        search.seed_incumbent(config.upper_bound);
        search
    }

    /// Uses First-Fit-Decreasing as the initial incumbent, unless it violates the given upper bound.
    fn seed_incumbent(&mut self, upper_bound: Option<u64>) {
        let expanded = self.instance.expand();
        let units = self.instance.units();
        let bins = ffd::first_fit(&expanded, ffd::decreasing_order(&expanded));
        let n_bins = bins.len() as u64;

        match upper_bound {
            Some(ub) if ub < n_bins => {
                debug!("[BNB] FFD uses {n_bins} pieces, above the upper bound of {ub}");
                self.best = ub.saturating_add(1);
            }
            _ => {
                debug!("[BNB] FFD incumbent uses {n_bins} pieces");
                let plan = bins
                    .iter()
                    .map(|b| {
                        b.item_ids
                            .iter()
                            .map(|&unit| self.group_of(units[unit]))
                            .collect_vec()
                    })
                    .collect_vec();
                self.best = n_bins;
                self.best_plan = Some(plan);
            }
        }
    }

    fn group_of(&self, type_id: usize) -> usize {
        self.group_types
            .iter()
            .position(|types| types.contains(&type_id))
            .expect("every demanded type belongs to a group")
    }

    /// Depth-first search over an explicit stack of frames, one per node on the current path.
    /// `self.path` holds the cut leading to every frame but the root.
    fn run(&mut self) {
        let mut stack = vec![];
        if self.visit(1, self.stock) {
            stack.push(Frame::new(1, self.stock, 0));
        }

        while let Some(frame) = stack.last_mut() {
            let Some(cut) = self.next_cut(frame) else {
                stack.pop();
                self.undo();
                continue;
            };
            let child = match cut {
                Cut::Unit(g) => Frame::new(frame.pieces, frame.free - self.lengths[g], g),
                Cut::NewPiece => Frame::new(frame.pieces + 1, self.stock, 0),
            };
            self.apply(cut);
            match self.visit(child.pieces, child.free) {
                true => stack.push(child),
                false => self.undo(),
            }
            if self.budget.is_exhausted() {
                return;
            }
        }
    }

    /// Registers a node and returns whether its children are worth exploring.
    fn visit(&mut self, pieces: u64, free: u64) -> bool {
        if self.budget.tick() {
            return false;
        }
        if self.remaining == 0 {
            //pruning guarantees this plan is an improvement
            self.record(pieces);
            return false;
        }
        let beyond_free = self.remaining.saturating_sub(free);
        pieces + beyond_free.div_ceil(self.stock) < self.best
    }

    /// Next untried branch of `frame`: a unit of a group that still fits,
    /// or a new piece once nothing fits anymore.
    fn next_cut(&self, frame: &mut Frame) -> Option<Cut> {
        while frame.next_group < self.lengths.len() {
            let g = frame.next_group;
            frame.next_group += 1;
            if self.demand[g] > 0 && self.lengths[g] <= frame.free {
                return Some(Cut::Unit(g));
            }
        }
        if frame.closed {
            return None;
        }
        frame.closed = true;
        let anything_fits =
            (0..self.lengths.len()).any(|g| self.demand[g] > 0 && self.lengths[g] <= frame.free);
        match anything_fits {
            true => None,
            false => Some(Cut::NewPiece),
        }
    }

    fn apply(&mut self, cut: Cut) {
        if let Cut::Unit(g) = cut {
            self.demand[g] -= 1;
            self.remaining -= self.lengths[g];
        }
        self.path.push(cut);
    }

    /// Reverts the last applied cut, if any.
    fn undo(&mut self) {
        if let Some(Cut::Unit(g)) = self.path.pop() {
            self.remaining += self.lengths[g];
            self.demand[g] += 1;
        }
    }

    fn record(&mut self, pieces: u64) {
        debug!(
            "[BNB] improved to {pieces} pieces after {} nodes",
            self.budget.nodes()
        );
        let plan = self
            .path
            .split(|cut| matches!(cut, Cut::NewPiece))
            .map(|piece| {
                piece
                    .iter()
                    .filter_map(|cut| match cut {
                        Cut::Unit(g) => Some(*g),
                        Cut::NewPiece => None,
                    })
                    .collect_vec()
            })
            .collect_vec();
        debug_assert_eq!(plan.len() as u64, pieces);

        self.best = pieces;
        self.best_plan = Some(plan);
        self.improvements += 1;
    }

    /// Translates a plan over length groups into a plan over item types.
    fn assign_types(&self, plan: &[Vec<usize>]) -> Vec<Vec<usize>> {
        let mut pending = self
            .group_types
            .iter()
            .map(|types| {
                types
                    .iter()
                    .flat_map(|&t| std::iter::repeat_n(t, self.instance.demand(t) as usize))
                    .collect_vec()
            })
            .collect_vec();

        plan.iter()
            .map(|piece| {
                piece
                    .iter()
                    .filter_map(|&g| pending[g].pop())
                    .collect_vec()
            })
            .collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn min_pieces(lengths: &[u64], demands: &[u64], stock: u64) -> u64 {
        let instance = CSInstance::new(lengths, demands, stock).unwrap();
        let outcome = solve(&instance, &BnBConfig::default()).unwrap();
        assert!(outcome.solution.status.is_optimal());
        assert!(solution_covers_demand(&instance, &outcome.solution));
        outcome.solution.total_rolls()
    }

    #[test_case(&[40, 40, 40], &[1, 1, 1], 120 => 1; "three fit in one")]
    #[test_case(&[40, 40, 40], &[2, 2, 2], 120 => 2; "doubled demand")]
    #[test_case(&[40, 40, 40], &[1, 1, 1], 100 => 2; "two per piece")]
    #[test_case(&[40, 40, 40], &[2, 2, 2], 100 => 3; "two per piece doubled")]
    #[test_case(&[6, 5, 4, 3, 2], &[1, 1, 2, 1, 1], 12 => 2; "ffd is suboptimal")]
    #[test_case(&[5, 4, 3], &[2, 2, 4], 15 => 2; "ffd is suboptimal again")]
    #[test_case(&[30, 70], &[0, 0], 100 => 0; "no demand")]
    fn minimum_stock_pieces(lengths: &[u64], demands: &[u64], stock: u64) -> u64 {
        min_pieces(lengths, demands, stock)
    }

    #[test]
    fn exceeding_length_is_rejected_before_search() {
        let instance = CSInstance::new(&[50, 150], &[1, 1], 100).unwrap();
        assert_eq!(
            solve(&instance, &BnBConfig::default()).unwrap_err(),
            SolveError::ItemExceedsCapacity {
                id: 1,
                size: 150,
                capacity: 100
            }
        );
    }

    #[test]
    fn unattainable_upper_bound() {
        let instance = CSInstance::new(&[60], &[3], 100).unwrap();
        let config = BnBConfig {
            upper_bound: Some(2),
            ..Default::default()
        };
        assert!(matches!(
            solve(&instance, &config),
            Err(SolveError::Infeasible(_))
        ));
    }

    #[test]
    fn large_demand_within_time_limit() {
        let instance = CSInstance::new(&[45, 36, 31, 14], &[970, 6100, 3950, 2110], 100).unwrap();
        let config = BnBConfig {
            time_limit_ms: Some(500),
            ..Default::default()
        };
        let outcome = solve(&instance, &config).unwrap();
        assert!(matches!(
            outcome.solution.status,
            SolveStatus::BudgetExhausted | SolveStatus::Optimal
        ));
        assert!(solution_covers_demand(&instance, &outcome.solution));
        assert!(outcome.solution.total_rolls() >= instance.lower_bound());
    }

    #[test]
    fn node_limit_returns_incumbent() {
        let instance = CSInstance::new(&[6, 5, 4, 3, 2], &[1, 1, 2, 1, 1], 12).unwrap();
        let config = BnBConfig {
            node_limit: Some(1),
            ..Default::default()
        };
        let outcome = solve(&instance, &config).unwrap();
        assert_eq!(outcome.solution.status, SolveStatus::BudgetExhausted);
        assert!(solution_covers_demand(&instance, &outcome.solution));
        assert_eq!(outcome.solution.total_rolls(), 3);
    }
}
