//! Seedable random number engine for noise sampling
//!
//! Each simulation worker owns its own [`RngEngine`]; models are shared
//! read-only, so reproducibility only depends on the engine's seed.

use crate::DiscreteDistribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random number engine used by noise samplers
#[derive(Debug, Clone)]
pub struct RngEngine {
    rng: StdRng,
    seed: Option<u64>,
}

impl RngEngine {
    /// Create an engine seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Create a deterministic engine from a seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Reseed the engine, restarting its sequence
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = Some(seed);
    }

    /// Seed of the engine, if it was seeded explicitly
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform random number in [0, 1)
    #[inline]
    pub fn rand(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draw an outcome index from a discrete distribution
    #[inline]
    pub fn rand_int(&mut self, distribution: &DiscreteDistribution) -> usize {
        distribution.sample(&mut self.rng)
    }
}

impl Default for RngEngine {
    fn default() -> Self {
        Self::new()
    }
}
