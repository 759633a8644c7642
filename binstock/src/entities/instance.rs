use itertools::Itertools;

use crate::entities::{Item, Piece};
use crate::error::{Result, SolveError};
use crate::util::assertions::consecutive_ids;

/// Instance of the Bin Packing Problem: a set of items to be packed into identical bins.
#[derive(Debug, Clone)]
pub struct BPInstance {
    /// The items to be packed, ids are consecutive starting from 0
    pub items: Vec<Item>,
    /// Capacity shared by every bin
    pub capacity: u64,
}

impl BPInstance {
    /// Creates an instance, assigning ids to the sizes in the given order.
    pub fn new(sizes: impl IntoIterator<Item = u64>, capacity: u64) -> Self {
        let items = sizes
            .into_iter()
            .enumerate()
            .map(|(id, size)| Item::new(id, size))
            .collect_vec();
        Self { items, capacity }
    }

    /// Checks whether the instance can be handed to a solver.
    /// Every solver calls this before doing any work.
    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.capacity)?;
        if !consecutive_ids(self.items.iter().map(|item| item.id)) {
            return Err(SolveError::InvalidInstance(
                "item ids should be consecutive, starting from 0".into(),
            ));
        }
        self.items
            .iter()
            .try_for_each(|item| validate_size(item, self.capacity))
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    pub fn size(&self, id: usize) -> u64 {
        self.items[id].size
    }

    pub fn sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.items.iter().map(|item| item.size)
    }

    pub fn total_size(&self) -> u64 {
        self.sizes().sum()
    }

    /// Trivial lower bound on the number of bins: `ceil(total_size / capacity)`
    pub fn lower_bound(&self) -> usize {
        self.total_size().div_ceil(self.capacity) as usize
    }
}

/// Instance of the one-dimensional Cutting Stock Problem:
/// item types with a demand, to be cut from identical stock rolls.
#[derive(Debug, Clone)]
pub struct CSInstance {
    /// The item types and how many times each has to be produced
    pub items: Vec<(Item, u64)>,
    /// Length (or width) of every stock roll
    pub stock_length: u64,
}

impl CSInstance {
    /// Creates an instance from parallel slices of lengths and demands.
    pub fn new(lengths: &[u64], demands: &[u64], stock_length: u64) -> Result<Self> {
        if lengths.len() != demands.len() {
            return Err(SolveError::InvalidInstance(format!(
                "{} lengths were given for {} demands",
                lengths.len(),
                demands.len()
            )));
        }
        let items = lengths
            .iter()
            .zip(demands)
            .enumerate()
            .map(|(id, (&length, &demand))| (Item::new(id, length), demand))
            .collect_vec();
        Ok(Self {
            items,
            stock_length,
        })
    }

    /// Checks whether the instance can be handed to a solver.
    /// Item types exceeding the stock length are rejected regardless of their demand.
    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.stock_length)?;
        if !consecutive_ids(self.items.iter().map(|(item, _)| item.id)) {
            return Err(SolveError::InvalidInstance(
                "item ids should be consecutive, starting from 0".into(),
            ));
        }
        self.items
            .iter()
            .try_for_each(|(item, _)| validate_size(item, self.stock_length))?;
        self.items
            .iter()
            .try_fold(0u64, |total, (item, demand)| {
                item.size
                    .checked_mul(*demand)
                    .and_then(|length| total.checked_add(length))
            })
            .map(|_| ())
            .ok_or_else(|| {
                SolveError::InvalidInstance("the total demanded length overflows u64".into())
            })
    }

    pub fn n_types(&self) -> usize {
        self.items.len()
    }

    pub fn length(&self, id: usize) -> u64 {
        self.items[id].0.size
    }

    pub fn demand(&self, id: usize) -> u64 {
        self.items[id].1
    }

    pub fn demands(&self) -> impl Iterator<Item = u64> + '_ {
        self.items.iter().map(|(_, demand)| *demand)
    }

    pub fn total_demand(&self) -> u64 {
        self.demands().sum()
    }

    /// Total length of all demanded units, saturating. [`Self::validate`] rejects overflow.
    pub fn total_length(&self) -> u64 {
        self.items
            .iter()
            .map(|(item, demand)| item.size.saturating_mul(*demand))
            .fold(0, u64::saturating_add)
    }

    /// Trivial lower bound on the number of rolls: `ceil(total_length / stock_length)`
    pub fn lower_bound(&self) -> u64 {
        self.total_length().div_ceil(self.stock_length)
    }

    /// The item type of every single unit of demand, in type order.
    pub fn units(&self) -> Vec<usize> {
        self.items
            .iter()
            .flat_map(|(item, demand)| std::iter::repeat_n(item.id, *demand as usize))
            .collect_vec()
    }

    /// Bin Packing counterpart of this instance, one item per unit of demand (see [`Self::units`]).
    pub fn expand(&self) -> BPInstance {
        BPInstance::new(
            self.units().into_iter().map(|type_id| self.length(type_id)),
            self.stock_length,
        )
    }
}

/// Instance of a 2D sheet cutting problem: as many pieces as possible out of one sheet.
#[derive(Debug, Clone)]
pub struct SheetInstance {
    pub pieces: Vec<Piece>,
    pub width: u64,
    pub height: u64,
}

impl SheetInstance {
    pub fn new(dims: impl IntoIterator<Item = (u64, u64)>, width: u64, height: u64) -> Self {
        let pieces = dims
            .into_iter()
            .enumerate()
            .map(|(id, (w, h))| Piece::new(id, w, h))
            .collect_vec();
        Self {
            pieces,
            width,
            height,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.width)?;
        validate_capacity(self.height)?;
        if !consecutive_ids(self.pieces.iter().map(|p| p.id)) {
            return Err(SolveError::InvalidInstance(
                "piece ids should be consecutive, starting from 0".into(),
            ));
        }
        for piece in &self.pieces {
            if piece.width == 0 || piece.height == 0 {
                return Err(SolveError::InvalidItem {
                    id: piece.id,
                    size: 0,
                });
            }
            if piece.width > self.width {
                return Err(SolveError::ItemExceedsCapacity {
                    id: piece.id,
                    size: piece.width,
                    capacity: self.width,
                });
            }
            if piece.height > self.height {
                return Err(SolveError::ItemExceedsCapacity {
                    id: piece.id,
                    size: piece.height,
                    capacity: self.height,
                });
            }
        }
        Ok(())
    }

    pub fn area(&self) -> u64 {
        self.width * self.height
    }
}

fn validate_capacity(capacity: u64) -> Result<()> {
    match capacity {
        0 => Err(SolveError::InvalidCapacity(0)),
        _ => Ok(()),
    }
}

fn validate_size(item: &Item, capacity: u64) -> Result<()> {
    if item.size == 0 {
        Err(SolveError::InvalidItem {
            id: item.id,
            size: 0,
        })
    } else if item.size > capacity {
        Err(SolveError::ItemExceedsCapacity {
            id: item.id,
            size: item.size,
            capacity,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bound_rounds_up() {
        let instance = BPInstance::new([60, 50, 40], 100);
        assert_eq!(instance.total_size(), 150);
        assert_eq!(instance.lower_bound(), 2);
    }

    #[test]
    fn zero_sized_item_is_invalid() {
        let instance = BPInstance::new([10, 0, 20], 100);
        assert_eq!(
            instance.validate(),
            Err(SolveError::InvalidItem { id: 1, size: 0 })
        );
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let instance = BPInstance::new([10], 0);
        assert_eq!(instance.validate(), Err(SolveError::InvalidCapacity(0)));
    }

    #[test]
    fn expansion_repeats_every_unit_of_demand() {
        let instance = CSInstance::new(&[30, 20], &[2, 3], 100).unwrap();
        assert_eq!(instance.units(), vec![0, 0, 1, 1, 1]);
        let expanded = instance.expand();
        assert_eq!(expanded.sizes().collect_vec(), vec![30, 30, 20, 20, 20]);
        assert_eq!(expanded.capacity, 100);
        assert_eq!(instance.lower_bound(), 2);
    }

    #[test]
    fn overflowing_total_length_is_invalid() {
        let instance = CSInstance::new(&[60, 50], &[1, u64::MAX / 50], 100).unwrap();
        assert!(matches!(
            instance.validate(),
            Err(SolveError::InvalidInstance(_))
        ));
        let instance = CSInstance::new(&[60, 50], &[3, u64::MAX / 10], 100).unwrap();
        assert!(matches!(
            instance.validate(),
            Err(SolveError::InvalidInstance(_))
        ));
        assert_eq!(instance.total_length(), u64::MAX);
    }

    #[test]
    fn mismatched_lengths_and_demands() {
        assert!(matches!(
            CSInstance::new(&[30, 20], &[2], 100),
            Err(SolveError::InvalidInstance(_))
        ));
    }

    #[test]
    fn piece_taller_than_sheet() {
        let instance = SheetInstance::new([(5, 5), (4, 12)], 10, 10);
        assert_eq!(
            instance.validate(),
            Err(SolveError::ItemExceedsCapacity {
                id: 1,
                size: 12,
                capacity: 10
            })
        );
    }
}
