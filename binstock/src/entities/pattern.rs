use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::entities::CSInstance;

/// Cutting pattern: how many units of every item type are cut from a single stock roll.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub counts: Vec<u64>,
}

impl Pattern {
    pub fn new(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    /// A pattern containing nothing, sized for `n_types` item types
    pub fn empty(n_types: usize) -> Self {
        Self {
            counts: vec![0; n_types],
        }
    }

    /// A pattern cutting as many units of a single item type as fit in one roll
    pub fn homogeneous(instance: &CSInstance, type_id: usize) -> Self {
        let mut pattern = Self::empty(instance.n_types());
        pattern.counts[type_id] = instance.stock_length / instance.length(type_id);
        pattern
    }

    /// A pattern built from a list of item types, one entry per cut unit
    pub fn from_cuts(n_types: usize, cuts: impl IntoIterator<Item = usize>) -> Self {
        let mut pattern = Self::empty(n_types);
        cuts.into_iter().for_each(|type_id| pattern.counts[type_id] += 1);
        pattern
    }

    /// Total length consumed by the pattern
    pub fn length(&self, instance: &CSInstance) -> u64 {
        self.counts
            .iter()
            .enumerate()
            .map(|(type_id, count)| instance.length(type_id) * count)
            .sum()
    }

    /// Unused length of the roll
    pub fn waste(&self, instance: &CSInstance) -> u64 {
        instance.stock_length - self.length(instance)
    }

    pub fn fits(&self, instance: &CSInstance) -> bool {
        self.counts.len() == instance.n_types() && self.length(instance) <= instance.stock_length
    }

    pub fn n_units(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Iterates over the item type of every unit cut by this pattern
    pub fn cuts(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts
            .iter()
            .enumerate()
            .flat_map(|(type_id, count)| std::iter::repeat_n(type_id, *count as usize))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.counts.iter().join(", "))
    }
}
