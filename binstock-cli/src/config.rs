use serde::{Deserialize, Serialize};

use binstock::util::{BnBConfig, ColGenConfig, GAConfig, MilpConfig};

use crate::samplers::synthetic::SyntheticConfig;

/// Configuration of the driver, bundling the configuration of every solver
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    /// Seed for the PRNG. If undefined, the driver will run in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
    pub milp: MilpConfig,
    pub bnb: BnBConfig,
    pub colgen: ColGenConfig,
    pub ga: GAConfig,
    /// Shape of the instances generated when no input file is provided
    pub synthetic: SyntheticConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            prng_seed: Some(0),
            milp: MilpConfig::default(),
            bnb: BnBConfig::default(),
            colgen: ColGenConfig::default(),
            ga: GAConfig::default(),
            synthetic: SyntheticConfig::default(),
        }
    }
}
