//! Gate noise channels and their samplers
//!
//! A gate's noise is described by a CPTP map. [`GateErrorModel`] splits that
//! map once into a classical mixture of three branches:
//!
//! - **Identity**: the gate runs ideally
//! - **Unitary**: one unitary from [`UnitaryError`] is applied after the gate
//! - **Kraus**: the remaining non-unitary part runs as a [`KrausError`]
//!
//! Unitary branches can be simulated as plain gates, so routing as much of the
//! channel as possible through them keeps trajectory simulation cheap.
//!
//! # Usage
//!
//! ```ignore
//! use simq_noise::{GateErrorModel, DecompositionConfig};
//!
//! let config = DecompositionConfig::new().with_error_probability(0.01);
//! let model = GateErrorModel::from_kraus_with_config(&kraus_ops, &config)?;
//!
//! // Per gate execution
//! let ops = model.sample_noise(&op, op.qubits(), &mut rng);
//! ```

pub mod gate_error;
pub mod kraus_error;
pub mod unitary_error;

pub use gate_error::{Branch, Decomposition, GateErrorModel};
pub use kraus_error::KrausError;
pub use unitary_error::UnitaryError;

use crate::{NoiseOps, Op, QubitId, RngEngine};
use std::fmt;

/// Trait for samplers that replace an operation with a noisy implementation
///
/// Sampling only reads the model, so one model may serve many worker threads
/// as long as each supplies its own [`RngEngine`].
pub trait NoiseSampler: Send + Sync + fmt::Debug {
    /// Sample the operations to run in place of `op` on `qubits`
    fn sample_noise(&self, op: &Op, qubits: &[QubitId], rng: &mut RngEngine) -> NoiseOps;
}
