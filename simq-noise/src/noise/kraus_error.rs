//! General Kraus error channel

use super::NoiseSampler;
use crate::{Matrix, NoiseError, NoiseOps, Op, QubitId, Result, RngEngine};
use std::sync::Arc;

/// Kraus error: a non-unitary channel that fires with some probability
///
/// When it fires, the operator set is emitted as a single [`Op::Kraus`] after
/// the ideal operation; the engine chooses the trajectory branch.
#[derive(Debug, Clone, PartialEq)]
pub struct KrausError {
    operators: Arc<[Matrix]>,
    probability: f64,
}

impl Default for KrausError {
    fn default() -> Self {
        Self {
            operators: Arc::from(Vec::new()),
            probability: 0.0,
        }
    }
}

impl KrausError {
    /// Create a Kraus error that always fires
    pub fn new(operators: Vec<Matrix>) -> Self {
        Self {
            operators: operators.into(),
            probability: 1.0,
        }
    }

    /// Replace the Kraus operators
    pub fn set_kraus(&mut self, operators: Vec<Matrix>) {
        self.operators = operators.into();
    }

    /// Set the activation probability
    ///
    /// # Errors
    /// Returns error if `probability` is not in [0, 1]
    pub fn set_probability(&mut self, probability: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(NoiseError::invalid_probability(
                "kraus activation",
                probability,
            ));
        }
        self.probability = probability;
        Ok(())
    }

    /// Kraus operators
    #[inline]
    pub fn operators(&self) -> &[Matrix] {
        &self.operators
    }

    /// Activation probability
    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl NoiseSampler for KrausError {
    fn sample_noise(&self, op: &Op, qubits: &[QubitId], rng: &mut RngEngine) -> NoiseOps {
        let fires = if self.operators.is_empty() || self.probability <= 0.0 {
            false
        } else if self.probability >= 1.0 {
            true
        } else {
            rng.rand() < self.probability
        };

        if fires {
            vec![op.clone(), Op::kraus(Arc::clone(&self.operators), qubits)]
        } else {
            vec![op.clone()]
        }
    }
}
