use anyhow::{Context, Result};
use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

use binstock::entities::{BPInstance, CSInstance, SheetInstance};

/// Distribution of the sizes (lengths, piece sides) of generated items
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizeDistribution {
    /// Uniform over `[1, max]`
    #[default]
    Uniform,
    /// Normal distribution rounded to the nearest integer and clipped to `[1, max]`.
    /// Mean and standard deviation are given as fractions of `max`.
    ClippedNormal { mean: f64, std_dev: f64 },
}

/// Configuration of the synthetic instance generators
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SyntheticConfig {
    pub size_distribution: SizeDistribution,
    /// Number of items of a Bin Packing instance
    pub n_items: usize,
    pub max_item_size: u64,
    pub capacity: u64,
    /// Number of item types of a Cutting Stock instance
    pub n_types: usize,
    pub max_length: u64,
    pub max_demand: u64,
    pub stock_length: u64,
    pub n_pieces: usize,
    pub max_piece_side: u64,
    pub sheet_width: u64,
    pub sheet_height: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            size_distribution: SizeDistribution::Uniform,
            n_items: 100,
            max_item_size: 50,
            capacity: 100,
            n_types: 10,
            max_length: 50,
            max_demand: 5,
            stock_length: 100,
            n_pieces: 10,
            max_piece_side: 10,
            sheet_width: 100,
            sheet_height: 100,
        }
    }
}

/// Samples integer sizes in `[1, max]`
#[derive(Debug, Clone)]
pub struct SizeSampler {
    distr: SizeDistr,
    max: u64,
}

#[derive(Debug, Clone)]
enum SizeDistr {
    Uniform(Uniform<u64>),
    Normal(Normal<f64>),
}

impl SizeSampler {
    pub fn new(distribution: SizeDistribution, max: u64) -> Result<Self> {
        let distr = match distribution {
            SizeDistribution::Uniform => SizeDistr::Uniform(
                Uniform::new_inclusive(1, max)
                    .with_context(|| format!("no sizes can be sampled in [1, {max}]"))?,
            ),
            SizeDistribution::ClippedNormal { mean, std_dev } => SizeDistr::Normal(
                Normal::new(mean * max as f64, std_dev * max as f64)
                    .context("invalid normal distribution")?,
            ),
        };
        Ok(Self { distr, max })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u64 {
        match &self.distr {
            SizeDistr::Uniform(u) => u.sample(rng),
            SizeDistr::Normal(n) => (n.sample(rng).round().max(1.0) as u64).min(self.max),
        }
    }
}

/// Bin Packing instance with `n_items` sizes in `[1, max_item_size]`
pub fn bp_instance(config: &SyntheticConfig, rng: &mut impl Rng) -> Result<BPInstance> {
    let sampler = SizeSampler::new(config.size_distribution, config.max_item_size)?;
    let sizes = (0..config.n_items).map(|_| sampler.sample(rng)).collect_vec();
    Ok(BPInstance::new(sizes, config.capacity))
}

/// Cutting Stock instance with `n_types` lengths in `[1, max_length]` and demands uniform in `[1, max_demand]`
pub fn cs_instance(config: &SyntheticConfig, rng: &mut impl Rng) -> Result<CSInstance> {
    let sampler = SizeSampler::new(config.size_distribution, config.max_length)?;
    let demand = Uniform::new_inclusive(1, config.max_demand)
        .with_context(|| format!("no demands can be sampled in [1, {}]", config.max_demand))?;
    let lengths = (0..config.n_types).map(|_| sampler.sample(rng)).collect_vec();
    let demands = (0..config.n_types).map(|_| demand.sample(rng)).collect_vec();
    Ok(CSInstance::new(&lengths, &demands, config.stock_length)?)
}

/// Sheet instance with `n_pieces` pieces whose sides lie in `[1, max_piece_side]`
pub fn sheet_instance(config: &SyntheticConfig, rng: &mut impl Rng) -> Result<SheetInstance> {
    let sampler = SizeSampler::new(config.size_distribution, config.max_piece_side)?;
    let dims = (0..config.n_pieces)
        .map(|_| (sampler.sample(rng), sampler.sample(rng)))
        .collect_vec();
    Ok(SheetInstance::new(
        dims,
        config.sheet_width,
        config.sheet_height,
    ))
}
