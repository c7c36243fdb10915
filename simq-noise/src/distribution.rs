//! Discrete probability distributions over labelled outcomes

use crate::{NoiseError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Immutable weighted distribution over outcomes `0..len()`
///
/// Weights are stored exactly as given and are not renormalised; sampling is
/// proportional to them, so `probability(i)` is `weight(i) / total()`.
/// Reconfiguring a model replaces the whole distribution rather than
/// editing weights in place.
#[derive(Debug, Clone)]
pub struct DiscreteDistribution {
    weights: Vec<f64>,
    total: f64,
    index: WeightedIndex<f64>,
}

impl DiscreteDistribution {
    /// Create a distribution from outcome weights
    ///
    /// # Errors
    /// Returns [`NoiseError::InvalidProbability`] if there are no weights, a
    /// weight is negative or non-finite, or all weights are zero
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if let Some(&bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(NoiseError::invalid_probability("weight", bad));
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(NoiseError::invalid_probability("total weight", total));
        }
        let index = WeightedIndex::new(&weights)
            .map_err(|_| NoiseError::invalid_probability("total weight", total))?;
        Ok(Self {
            weights,
            total,
            index,
        })
    }

    /// Raw weights as supplied
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sum of all weights
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of outcomes
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether there are no outcomes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Normalised probability of an outcome (0 for out-of-range indices)
    pub fn probability(&self, outcome: usize) -> f64 {
        self.weights
            .get(outcome)
            .map_or(0.0, |w| w / self.total)
    }

    /// Draw one outcome index
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }
}

impl Default for DiscreteDistribution {
    fn default() -> Self {
        Self {
            weights: vec![1.0],
            total: 1.0,
            index: WeightedIndex::new([1.0]).expect("single positive weight is valid"),
        }
    }
}

impl PartialEq for DiscreteDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.weights == other.weights
    }
}
