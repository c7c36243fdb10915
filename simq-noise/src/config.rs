//! Decomposition configuration

use crate::{NoiseError, Result};

/// Default numerical tolerance shared by every predicate in a decomposition
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Configuration for decomposing a CPTP map into a gate error
///
/// The tolerance is threaded through the squareness, identity, unitarity and
/// CPTP checks alike; a single decomposition never mixes tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecompositionConfig {
    /// Numerical tolerance for every matrix predicate
    pub tolerance: f64,

    /// Probability that the channel is applied at all (otherwise the gate is ideal)
    pub error_probability: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            error_probability: 1.0,
        }
    }
}

impl DecompositionConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the numerical tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the error activation probability
    pub fn with_error_probability(mut self, error_probability: f64) -> Self {
        self.error_probability = error_probability;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns error if the tolerance is not positive and finite, or the
    /// error probability lies outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(NoiseError::InvalidTolerance(self.tolerance));
        }
        if !(0.0..=1.0).contains(&self.error_probability) {
            return Err(NoiseError::invalid_probability(
                "error_probability",
                self.error_probability,
            ));
        }
        Ok(())
    }
}
