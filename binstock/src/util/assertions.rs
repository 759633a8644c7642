//Various checks to verify correctness of instances and solutions
//Used in debug_assert!() blocks and by the exact solvers before returning

use itertools::Itertools;
use log::error;

use crate::entities::{BPInstance, Bin, CSInstance, CSSolution, SheetInstance, SheetPlacement};

pub fn consecutive_ids(ids: impl Iterator<Item = usize>) -> bool {
    ids.enumerate().all(|(i, id)| i == id)
}

/// Every item of the instance appears in exactly one bin.
pub fn bins_partition_items(instance: &BPInstance, bins: &[Bin]) -> bool {
    let mut seen = vec![false; instance.n_items()];
    for id in bins.iter().flat_map(|b| b.item_ids.iter()) {
        match seen.get_mut(*id) {
            Some(s) if !*s => *s = true,
            Some(_) => {
                error!("item {id} is packed more than once");
                return false;
            }
            None => {
                error!("unknown item {id} is packed");
                return false;
            }
        }
    }
    match seen.iter().positions(|s| !s).next() {
        Some(missing) => {
            error!("item {missing} is not packed");
            false
        }
        None => true,
    }
}

/// Every bin is non-empty, its load is consistent and does not exceed the capacity.
pub fn bins_within_capacity(instance: &BPInstance, bins: &[Bin]) -> bool {
    bins.iter().all(|b| {
        let load = b.item_ids.iter().map(|&id| instance.size(id)).sum::<u64>();
        !b.item_ids.is_empty() && load == b.load && load <= instance.capacity
    })
}

/// Every pattern fits in a stock roll.
pub fn patterns_within_stock(instance: &CSInstance, sol: &CSSolution) -> bool {
    sol.patterns.iter().all(|(p, _)| p.fits(instance))
}

/// The produced quantity meets or exceeds the demand of every item type.
pub fn solution_covers_demand(instance: &CSInstance, sol: &CSSolution) -> bool {
    sol.produced(instance.n_types())
        .iter()
        .zip(instance.demands())
        .all(|(produced, demand)| *produced >= demand)
}

/// All placements lie within the sheet and no two pieces overlap.
pub fn sheet_placements_valid(instance: &SheetInstance, placements: &[SheetPlacement]) -> bool {
    let rect = |p: &SheetPlacement| {
        let piece = &instance.pieces[p.piece_id];
        (p.x, p.y, p.x + piece.width, p.y + piece.height)
    };
    let inside = placements.iter().all(|p| {
        let (_, _, x_max, y_max) = rect(p);
        x_max <= instance.width && y_max <= instance.height
    });
    let disjoint = placements.iter().tuple_combinations().all(|(a, b)| {
        let (ax0, ay0, ax1, ay1) = rect(a);
        let (bx0, by0, bx1, by1) = rect(b);
        ax1 <= bx0 || bx1 <= ax0 || ay1 <= by0 || by1 <= ay0
    });
    inside && disjoint
}
