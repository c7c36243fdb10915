//! Gate error: a CPTP map split into identity, unitary and Kraus branches
//!
//! Applying a generic Kraus channel during trajectory simulation is expensive
//! compared to applying a unitary. Most physical gate errors are dominated by
//! scaled identity and scaled unitary terms, so the channel is decomposed once
//! into a three-way classical mixture and each gate execution samples a branch.
//!
//! # Decomposition
//!
//! For Kraus operators {Mₖ} with Σ Mₖ†Mₖ = I, each operator gets the weight
//! `p = (Mₖ Mₖ†)₀₀`. The rescaled operator `Mₖ/√p` is then classified as
//! identity, unitary, or neither. Whatever weight is not identity or unitary
//! belongs to the Kraus branch, whose operators are rescaled so that branch is
//! itself CPTP.

use super::{KrausError, NoiseSampler, UnitaryError};
use crate::{
    DecompositionConfig, DiscreteDistribution, Matrix, NoiseError, NoiseOps, Op, QubitId, Result,
    RngEngine,
};
use log::{debug, trace, warn};

/// Branch of a gate error mixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// No error, the gate runs ideally
    Identity,
    /// A unitary error drawn from the unitary sub-channel
    Unitary,
    /// The non-unitary Kraus sub-channel
    Kraus,
}

impl Branch {
    /// All branches in distribution order
    pub const ALL: [Branch; 3] = [Branch::Identity, Branch::Unitary, Branch::Kraus];

    /// Position of the branch in the mixture distribution
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Branch::Identity => 0,
            Branch::Unitary => 1,
            Branch::Kraus => 2,
        }
    }

    /// Branch for a distribution outcome
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Result of partitioning a CPTP map, before the error probability is folded in
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Total weight of scaled-identity operators
    pub p_identity: f64,
    /// Total weight of scaled-unitary operators
    pub p_unitary: f64,
    /// Remaining weight, carried by the Kraus operators
    pub p_kraus: f64,
    /// Normalised unitaries
    pub unitaries: Vec<Matrix>,
    /// Weights of `unitaries`, summing to 1 when any are present
    pub unitary_probabilities: Vec<f64>,
    /// Kraus operators rescaled to form a CPTP map on their own
    pub kraus: Vec<Matrix>,
    /// Dimension of every operator
    pub dimension: usize,
}

impl Decomposition {
    /// Partition a CPTP map into identity, unitary and Kraus parts
    ///
    /// # Errors
    /// - [`NoiseError::EmptyChannel`] if `mats` is empty
    /// - [`NoiseError::NonSquareOperator`] / [`NoiseError::DimensionMismatch`]
    ///   for malformed operators, reported before any other work
    /// - [`NoiseError::InvalidChannel`] if Σ M†M is not the identity
    /// - [`NoiseError::InvalidDecomposition`] if the recovered weights are
    ///   inconsistent with the CPTP check, or the rescaled Kraus branch is not
    ///   trace preserving on its own
    pub fn new(mats: &[Matrix], tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(NoiseError::InvalidTolerance(tolerance));
        }
        let dimension = check_shapes(mats)?;

        let deviation = completeness(mats, dimension).max_deviation_from_identity();
        if deviation > tolerance {
            return Err(NoiseError::InvalidChannel { deviation });
        }

        let mut p_identity = 0.0;
        let mut p_unitary = 0.0;
        let mut unitaries = Vec::new();
        let mut unitary_probabilities = Vec::new();
        let mut kraus = Vec::new();

        for (index, mat) in mats.iter().enumerate() {
            let p = mat.row_norm_sqr(0);
            if p <= 0.0 {
                if mat.as_slice().iter().any(|x| x.norm() > tolerance) {
                    warn!("Kraus operator {} has zero weight in row 0 and is dropped", index);
                }
                continue;
            }

            let normalized = mat.scale(1.0 / p.sqrt());
            if normalized.is_identity(tolerance) {
                trace!("Kraus operator {}: identity, p = {}", index, p);
                p_identity += p;
            } else if normalized.is_unitary(tolerance) {
                trace!("Kraus operator {}: unitary, p = {}", index, p);
                p_unitary += p;
                unitaries.push(normalized);
                unitary_probabilities.push(p);
            } else {
                trace!("Kraus operator {}: general Kraus", index);
                kraus.push(mat.clone());
            }
        }

        let mut p_kraus = 1.0 - p_identity - p_unitary;
        if (p_identity + p_unitary + p_kraus - 1.0).abs() > tolerance {
            return Err(NoiseError::invalid_decomposition(format!(
                "branch weights {} + {} + {} do not sum to 1",
                p_identity, p_unitary, p_kraus
            )));
        }
        if p_kraus < -tolerance {
            return Err(NoiseError::invalid_decomposition(format!(
                "identity and unitary weights exceed 1 by {}",
                -p_kraus
            )));
        }
        // Rounding residue, not a real Kraus branch
        if p_kraus <= tolerance && (p_kraus < 0.0 || kraus.is_empty()) {
            p_kraus = 0.0;
        }
        if kraus.is_empty() && p_kraus > 0.0 {
            return Err(NoiseError::invalid_decomposition(format!(
                "Kraus branch has weight {} but no operators",
                p_kraus
            )));
        }

        if p_kraus > 0.0 && p_kraus < 1.0 {
            let factor = 1.0 / p_kraus.sqrt();
            for k in &mut kraus {
                *k = k.scale(factor);
            }
        }
        if p_kraus > 0.0 {
            // Dropped zero-weight operators can leave trace the branch misses
            let deviation = completeness(&kraus, dimension).max_deviation_from_identity();
            if deviation > tolerance {
                return Err(NoiseError::invalid_decomposition(format!(
                    "Kraus branch deviates from trace preserving by {}",
                    deviation
                )));
            }
        }
        if p_unitary > 0.0 && p_unitary < 1.0 {
            for p in &mut unitary_probabilities {
                *p /= p_unitary;
            }
        }

        debug!(
            "Decomposed {} Kraus operators: p_identity = {}, p_unitary = {} ({} unitaries), p_kraus = {} ({} operators)",
            mats.len(),
            p_identity,
            p_unitary,
            unitaries.len(),
            p_kraus,
            kraus.len()
        );

        Ok(Self {
            p_identity,
            p_unitary,
            p_kraus,
            unitaries,
            unitary_probabilities,
            kraus,
            dimension,
        })
    }

    /// Branch weights once the channel only fires with `error_probability`
    pub fn branch_probabilities(&self, error_probability: f64) -> [f64; 3] {
        [
            1.0 - error_probability + error_probability * self.p_identity,
            error_probability * self.p_unitary,
            error_probability * self.p_kraus,
        ]
    }
}

/// Σ M†M over the operators
fn completeness(mats: &[Matrix], dimension: usize) -> Matrix {
    let mut sum = Matrix::zeros(dimension, dimension);
    for mat in mats {
        sum.add_assign(&mat.adjoint().matmul(mat));
    }
    sum
}

/// Check every operator is square and of one dimension, returning it
fn check_shapes(mats: &[Matrix]) -> Result<usize> {
    let first = mats.first().ok_or(NoiseError::EmptyChannel)?;
    let dimension = first.rows();
    for (index, mat) in mats.iter().enumerate() {
        if !mat.is_square() {
            return Err(NoiseError::NonSquareOperator {
                index,
                rows: mat.rows(),
                cols: mat.cols(),
            });
        }
        if mat.rows() != dimension {
            return Err(NoiseError::DimensionMismatch {
                index,
                expected: dimension,
                actual: mat.rows(),
            });
        }
    }
    Ok(dimension)
}

/// Noise model for a single gate
///
/// Holds the three-way branch distribution and the two sub-channels. A model
/// is configured once and then sampled read-only, possibly from many threads.
///
/// # Example
/// ```
/// use simq_noise::{Branch, DecompositionConfig, GateErrorModel, Matrix};
///
/// let config = DecompositionConfig::new().with_error_probability(0.2);
/// let model = GateErrorModel::from_kraus_with_config(&[Matrix::identity(2)], &config).unwrap();
/// assert_eq!(model.probability(Branch::Identity), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GateErrorModel {
    /// Weights of [`Branch::ALL`]
    probabilities: DiscreteDistribution,
    unitary_error: UnitaryError,
    kraus_error: KrausError,
    /// Operator dimension, when built from a Kraus map
    dimension: Option<usize>,
}

impl Default for GateErrorModel {
    fn default() -> Self {
        Self {
            probabilities: DiscreteDistribution::new(vec![1.0, 0.0, 0.0])
                .expect("identity-only weights are valid"),
            unitary_error: UnitaryError::default(),
            kraus_error: KrausError::default(),
            dimension: None,
        }
    }
}

impl GateErrorModel {
    /// Create an ideal model that always returns the original operation
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from Kraus operators with default tolerance and
    /// error probability 1
    pub fn from_kraus(mats: &[Matrix]) -> Result<Self> {
        Self::from_kraus_with_config(mats, &DecompositionConfig::default())
    }

    /// Build a model from Kraus operators
    pub fn from_kraus_with_config(mats: &[Matrix], config: &DecompositionConfig) -> Result<Self> {
        let mut model = Self::default();
        model.set_from_ops(mats, config)?;
        Ok(model)
    }

    /// Reconfigure the model from a CPTP map
    ///
    /// The model is replaced wholesale on success and left untouched on error.
    ///
    /// # Errors
    /// Returns error if the config is invalid or the map fails decomposition
    /// (see [`Decomposition::new`])
    pub fn set_from_ops(&mut self, mats: &[Matrix], config: &DecompositionConfig) -> Result<()> {
        config.validate()?;
        let decomposition = Decomposition::new(mats, config.tolerance)?;

        let probabilities = DiscreteDistribution::new(
            decomposition
                .branch_probabilities(config.error_probability)
                .to_vec(),
        )?;
        let unitary_error = UnitaryError::new(
            decomposition.unitaries,
            decomposition.unitary_probabilities,
        )?;
        let kraus_error = if decomposition.kraus.is_empty() {
            KrausError::default()
        } else {
            KrausError::new(decomposition.kraus)
        };

        *self = Self {
            probabilities,
            unitary_error,
            kraus_error,
            dimension: Some(decomposition.dimension),
        };
        Ok(())
    }

    /// Replace the branch weights
    ///
    /// Values are stored as given and never renormalised, and they are not
    /// checked against the configured sub-channels. Sampling is proportional
    /// to the weights, so callers should pass values summing to 1.
    ///
    /// # Errors
    /// Returns error if a weight is negative or non-finite, or all are zero
    pub fn set_probabilities(&mut self, p_identity: f64, p_unitary: f64, p_kraus: f64) -> Result<()> {
        self.probabilities = DiscreteDistribution::new(vec![p_identity, p_unitary, p_kraus])?;
        Ok(())
    }

    /// Replace the Kraus sub-channel
    pub fn set_kraus(&mut self, error: KrausError) {
        self.kraus_error = error;
    }

    /// Replace the unitary sub-channel
    pub fn set_unitary(&mut self, error: UnitaryError) {
        self.unitary_error = error;
    }

    /// Branch weights as stored, ordered as [`Branch::ALL`]
    pub fn probabilities(&self) -> [f64; 3] {
        let w = self.probabilities.weights();
        [w[0], w[1], w[2]]
    }

    /// Normalised probability of a branch
    pub fn probability(&self, branch: Branch) -> f64 {
        self.probabilities.probability(branch.index())
    }

    /// Unitary sub-channel
    #[inline]
    pub fn unitary_error(&self) -> &UnitaryError {
        &self.unitary_error
    }

    /// Kraus sub-channel
    #[inline]
    pub fn kraus_error(&self) -> &KrausError {
        &self.kraus_error
    }

    /// Number of qubits the error acts on, if built from a 2ⁿ-dimensional map
    pub fn num_qubits(&self) -> Option<usize> {
        self.dimension
            .filter(|d| d.is_power_of_two())
            .map(|d| d.trailing_zeros() as usize)
    }

    /// Draw the branch for one gate execution
    pub fn sample_branch(&self, rng: &mut RngEngine) -> Branch {
        let index = rng.rand_int(&self.probabilities);
        match Branch::from_index(index) {
            Some(branch) => branch,
            None => unreachable!("GateErrorModel branch {} is out of range", index),
        }
    }
}

impl NoiseSampler for GateErrorModel {
    fn sample_noise(&self, op: &Op, qubits: &[QubitId], rng: &mut RngEngine) -> NoiseOps {
        match self.sample_branch(rng) {
            Branch::Identity => vec![op.clone()],
            Branch::Unitary => self.unitary_error.sample_noise(op, qubits, rng),
            Branch::Kraus => self.kraus_error.sample_noise(op, qubits, rng),
        }
    }
}
