//! Minimum number of items filling a single bin *exactly*.
//!
//! This is a 0/1 subset-sum dynamic program over one container, not a multi-bin packing:
//! `best[j]` is the minimum number of distinct items whose sizes add up to exactly `j`.

use std::time::Instant;

use log::info;

use crate::entities::BPInstance;
use crate::error::{Result, SolveError};

/// Largest capacity for which a table is allocated
pub const MAX_TABLE_CAPACITY: u64 = 1 << 26;

/// Table of the subset-sum dynamic program, `None` marks an unreachable sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSumTable {
    best: Vec<Option<usize>>,
}

impl SubsetSumTable {
    /// Fills the table for all sums in `[0, capacity]`. O(N * C) time, O(C) space.
    pub fn build(instance: &BPInstance) -> Result<Self> {
        instance.validate()?;
        if instance.capacity > MAX_TABLE_CAPACITY {
            return Err(SolveError::InvalidInstance(format!(
                "capacity {} is too large for a table of at most {MAX_TABLE_CAPACITY} cells",
                instance.capacity
            )));
        }
        let capacity = instance.capacity as usize;

        let mut best: Vec<Option<usize>> = vec![None; capacity + 1];
        best[0] = Some(0);

        for size in instance.sizes().map(|s| s as usize) {
            //downward, so every item is used at most once
            for j in (size..=capacity).rev() {
                if let Some(n) = best[j - size] {
                    if best[j].is_none_or(|m| n + 1 < m) {
                        best[j] = Some(n + 1);
                    }
                }
            }
        }

        Ok(Self { best })
    }

    /// Minimum number of items summing to exactly `sum`, `None` if no subset does.
    pub fn min_items(&self, sum: usize) -> Option<usize> {
        self.best.get(sum).copied().flatten()
    }

    pub fn capacity(&self) -> usize {
        self.best.len() - 1
    }

    /// Largest sum that can be formed without exceeding the capacity
    pub fn max_reachable(&self) -> usize {
        self.best
            .iter()
            .rposition(|b| b.is_some())
            .unwrap_or_default()
    }
}

/// Minimum number of items filling one bin exactly.
///
/// An unreachable capacity is reported as [`SolveError::Infeasible`], never as a number.
pub fn solve(instance: &BPInstance) -> Result<usize> {
    let start = Instant::now();
    let table = SubsetSumTable::build(instance)?;
    let result = table.min_items(table.capacity());

    info!(
        "[DP] subset-sum over {} items and capacity {} finished in {:.3}ms: {:?}",
        instance.n_items(),
        instance.capacity,
        start.elapsed().as_secs_f64() * 1000.0,
        result
    );

    result.ok_or_else(|| {
        SolveError::Infeasible(format!(
            "no subset of the items sums to exactly {}, closest is {}",
            instance.capacity,
            table.max_reachable()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_and_five() {
        let table = SubsetSumTable::build(&BPInstance::new([3, 5], 8)).unwrap();
        assert_eq!(table.min_items(0), Some(0));
        assert_eq!(table.min_items(3), Some(1));
        assert_eq!(table.min_items(8), Some(2));
        assert_eq!(table.min_items(4), None);
        assert_eq!(table.min_items(6), None); // 3 can only be used once
    }

    #[test]
    fn prefers_fewer_items() {
        let instance = BPInstance::new([1, 1, 1, 1, 2, 2, 4], 4);
        assert_eq!(solve(&instance), Ok(1));
    }

    #[test]
    fn unreachable_capacity_is_infeasible() {
        let instance = BPInstance::new([3, 5], 7);
        assert!(matches!(solve(&instance), Err(SolveError::Infeasible(_))));
    }

    #[test]
    fn closest_reachable_sum() {
        let table = SubsetSumTable::build(&BPInstance::new([6, 9], 14)).unwrap();
        assert_eq!(table.max_reachable(), 9);
    }
}
