//! Error types for noise model construction

use thiserror::Error;

/// Errors that can occur while building or configuring a noise model
///
/// All of these surface at configuration time. Sampling never returns an
/// error: an out-of-range branch during sampling is a logic defect and panics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoiseError {
    /// Kraus operators do not satisfy Σ K† K = I
    #[error("Input is not a CPTP map: Σ K†K deviates from identity by {deviation:e}")]
    InvalidChannel { deviation: f64 },

    /// No Kraus operators were supplied
    #[error("Channel must contain at least one Kraus operator")]
    EmptyChannel,

    /// A Kraus operator is not square
    #[error("Error matrix {index} is not square ({rows}×{cols})")]
    NonSquareOperator {
        index: usize,
        rows: usize,
        cols: usize,
    },

    /// Kraus operators have different dimensions
    #[error("Error matrix {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Per-operator classification disagrees with the global CPTP check
    #[error("Gate error decomposition is invalid: {0}")]
    InvalidDecomposition(String),

    /// A probability is negative, non-finite or out of range
    #[error("Invalid probability {name} = {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// Operator and weight lists have different lengths
    #[error("Got {operators} operators but {weights} weights")]
    LengthMismatch { operators: usize, weights: usize },

    /// Numerical tolerance must be positive and finite
    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    /// Flat matrix data does not match the requested shape
    #[error("Matrix data of length {len} doesn't match shape {rows}×{cols}")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },
}

impl NoiseError {
    /// Create an invalid probability error
    pub fn invalid_probability(name: &'static str, value: f64) -> Self {
        Self::InvalidProbability { name, value }
    }

    /// Create an invalid decomposition error
    pub fn invalid_decomposition(reason: impl Into<String>) -> Self {
        Self::InvalidDecomposition(reason.into())
    }
}
