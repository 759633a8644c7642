use std::cmp::Reverse;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};

use crate::entities::{BPInstance, BPSolution, Bin, SolveStatus};
use crate::error::Result;
use crate::util::assertions::{bins_partition_items, bins_within_capacity};

/// Packs the items with the First-Fit-Decreasing heuristic.
///
/// Items are considered by decreasing size, ties keep their input order.
/// Every item goes into the first bin (in order of creation) with enough room left,
/// a new bin is opened if none has.
pub fn solve(instance: &BPInstance) -> Result<BPSolution> {
    instance.validate()?;
    let start = Instant::now();

    let bins = first_fit(instance, decreasing_order(instance));

    debug_assert!(bins_partition_items(instance, &bins));
    debug_assert!(bins_within_capacity(instance, &bins));

    info!(
        "[FFD] packed {} items into {} bins (lower bound: {}) in {:.3}ms",
        instance.n_items(),
        bins.len(),
        instance.lower_bound(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let status = match bins.len() == instance.lower_bound() {
        true => SolveStatus::Optimal,
        false => SolveStatus::Heuristic,
    };
    Ok(BPSolution::new(bins, status))
}

/// Item ids sorted by decreasing size, stable with respect to the input order.
pub fn decreasing_order(instance: &BPInstance) -> Vec<usize> {
    (0..instance.n_items())
        .sorted_by_key(|&id| Reverse(instance.size(id)))
        .collect_vec()
}

/// Packs the items in the given order, each into the first bin with enough room left.
///
/// Assumes every item fits in an empty bin.
pub fn first_fit(instance: &BPInstance, order: impl IntoIterator<Item = usize>) -> Vec<Bin> {
    let mut bins: Vec<Bin> = vec![];
    for id in order {
        let size = instance.size(id);
        match bins
            .iter_mut()
            .find(|b| b.load + size <= instance.capacity)
        {
            Some(bin) => bin.push(id, size),
            None => {
                debug!("[FFD] opening bin {} for item {id}", bins.len());
                bins.push(Bin::with_item(id, size));
            }
        }
    }
    bins
}

/// Number of bins First-Fit would use for the given order, without materialising the bins.
pub fn first_fit_count(instance: &BPInstance, order: impl IntoIterator<Item = usize>) -> usize {
    let mut loads: Vec<u64> = vec![];
    for id in order {
        let size = instance.size(id);
        match loads.iter_mut().find(|l| **l + size <= instance.capacity) {
            Some(load) => *load += size,
            None => loads.push(size),
        }
    }
    loads.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolveError;

    #[test]
    fn first_fitting_bin_not_best_fitting() {
        // sorted: 60, 50, 42, 8
        // 60 -> bin 0, 50 -> bin 1, 42 -> bin 1, 8 -> bin 0 (best fit would pick bin 1)
        let instance = BPInstance::new([42, 60, 8, 50], 100);
        let sol = solve(&instance).unwrap();
        assert_eq!(sol.bin_sizes(&instance), vec![vec![60, 8], vec![50, 42]]);
    }

    #[test]
    fn ties_keep_input_order() {
        let instance = BPInstance::new([50, 70, 50, 50], 100);
        assert_eq!(decreasing_order(&instance), vec![1, 0, 2, 3]);
        let sol = solve(&instance).unwrap();
        let ids = sol.bins.iter().map(|b| b.item_ids.clone()).collect_vec();
        assert_eq!(ids, vec![vec![1], vec![0, 2], vec![3]]);
    }

    #[test]
    fn count_matches_packing() {
        let instance = BPInstance::new([9, 8, 2, 2, 5, 4, 7, 1], 10);
        let order = decreasing_order(&instance);
        assert_eq!(
            first_fit_count(&instance, order.iter().copied()),
            first_fit(&instance, order).len()
        );
    }

    #[test]
    fn empty_instance() {
        let sol = solve(&BPInstance::new([], 10)).unwrap();
        assert_eq!(sol.n_bins(), 0);
        assert!(sol.status.is_optimal());
    }

    #[test]
    fn oversized_item() {
        let instance = BPInstance::new([20, 150], 100);
        assert_eq!(
            solve(&instance).unwrap_err(),
            SolveError::ItemExceedsCapacity {
                id: 1,
                size: 150,
                capacity: 100
            }
        );
    }
}
