//! Mixed unitary error channel

use super::NoiseSampler;
use crate::{DiscreteDistribution, Matrix, NoiseError, NoiseOps, Op, QubitId, Result, RngEngine};
use std::sync::Arc;

/// Unitary error: a weighted random choice among unitary matrices
///
/// The sampled unitary is applied after the ideal operation.
///
/// # Example
/// ```
/// # use simq_noise::{Matrix, UnitaryError};
/// let err = UnitaryError::new(vec![Matrix::identity(2)], vec![1.0]).unwrap();
/// assert_eq!(err.num_unitaries(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitaryError {
    unitaries: Vec<Arc<Matrix>>,
    /// `None` until probabilities are set
    probabilities: Option<DiscreteDistribution>,
}

impl UnitaryError {
    /// Create a unitary error from matrices and their weights
    ///
    /// # Errors
    /// Returns error if the counts differ or the weights are invalid
    pub fn new(unitaries: Vec<Matrix>, probabilities: Vec<f64>) -> Result<Self> {
        let mut err = Self::default();
        err.configure(unitaries, probabilities)?;
        Ok(err)
    }

    /// Replace both the unitaries and their weights
    ///
    /// # Errors
    /// Returns error if the counts differ or the weights are invalid. The
    /// channel is left unchanged on error.
    pub fn configure(&mut self, unitaries: Vec<Matrix>, probabilities: Vec<f64>) -> Result<()> {
        if unitaries.len() != probabilities.len() {
            return Err(NoiseError::LengthMismatch {
                operators: unitaries.len(),
                weights: probabilities.len(),
            });
        }
        let distribution = if probabilities.is_empty() {
            None
        } else {
            Some(DiscreteDistribution::new(probabilities)?)
        };
        self.unitaries = unitaries.into_iter().map(Arc::new).collect();
        self.probabilities = distribution;
        Ok(())
    }

    /// Replace the candidate unitaries, keeping the current weights
    ///
    /// # Errors
    /// Returns [`NoiseError::LengthMismatch`] if weights are set and their
    /// count differs. The channel is left unchanged on error.
    pub fn set_unitaries(&mut self, unitaries: Vec<Matrix>) -> Result<()> {
        if let Some(distribution) = &self.probabilities {
            if distribution.len() != unitaries.len() {
                return Err(NoiseError::LengthMismatch {
                    operators: unitaries.len(),
                    weights: distribution.len(),
                });
            }
        }
        self.unitaries = unitaries.into_iter().map(Arc::new).collect();
        Ok(())
    }

    /// Replace the weights, keeping the current unitaries
    ///
    /// An empty list clears the weights.
    ///
    /// # Errors
    /// Returns error if the weights are invalid or, when non-empty, their
    /// count differs from the number of unitaries
    pub fn set_probabilities(&mut self, probabilities: Vec<f64>) -> Result<()> {
        if probabilities.is_empty() {
            self.probabilities = None;
            return Ok(());
        }
        if probabilities.len() != self.unitaries.len() {
            return Err(NoiseError::LengthMismatch {
                operators: self.unitaries.len(),
                weights: probabilities.len(),
            });
        }
        self.probabilities = Some(DiscreteDistribution::new(probabilities)?);
        Ok(())
    }

    /// Candidate unitaries
    pub fn unitaries(&self) -> impl Iterator<Item = &Matrix> + '_ {
        self.unitaries.iter().map(|u| u.as_ref())
    }

    /// Number of candidate unitaries
    #[inline]
    pub fn num_unitaries(&self) -> usize {
        self.unitaries.len()
    }

    /// Weights of the candidates, empty if unset
    pub fn probabilities(&self) -> &[f64] {
        self.probabilities
            .as_ref()
            .map_or(&[][..], |d| d.weights())
    }
}

impl NoiseSampler for UnitaryError {
    fn sample_noise(&self, op: &Op, qubits: &[QubitId], rng: &mut RngEngine) -> NoiseOps {
        let Some(distribution) = &self.probabilities else {
            return vec![op.clone()];
        };
        let index = rng.rand_int(distribution);
        match self.unitaries.get(index) {
            Some(unitary) => vec![op.clone(), Op::unitary(Arc::clone(unitary), qubits)],
            None => unreachable!(
                "UnitaryError drew index {} of {} unitaries",
                index,
                self.unitaries.len()
            ),
        }
    }
}
