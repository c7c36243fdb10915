//! Gate error models for SimQ
//!
//! This crate turns a quantum channel given as Kraus operators into an
//! efficient classical mixture of three error types and samples from it
//! during simulation:
//!
//! - [`GateErrorModel`]: identity / unitary / Kraus mixture for one gate
//! - [`UnitaryError`]: weighted random choice among unitary matrices
//! - [`KrausError`]: general (non-unitary) Kraus channel
//! - [`Matrix`]: dense complex matrices and the predicates used to classify them
//!
//! # Example
//! ```
//! use simq_noise::{GateErrorModel, Matrix, Op, QubitId, RngEngine};
//! use simq_noise::noise::NoiseSampler;
//! use num_complex::Complex64;
//!
//! // Bit-flip channel with probability 0.1
//! let p: f64 = 0.1;
//! let k0 = Matrix::identity(2).scale(Complex64::new((1.0 - p).sqrt(), 0.0));
//! let k1 = Matrix::from_rows(&[
//!     [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
//!     [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
//! ])
//! .scale(Complex64::new(p.sqrt(), 0.0));
//!
//! let model = GateErrorModel::from_kraus(&[k0, k1]).unwrap();
//!
//! let q0 = QubitId::new(0);
//! let op = Op::gate("x", &[q0]);
//! let mut rng = RngEngine::with_seed(42);
//! let ops = model.sample_noise(&op, &[q0], &mut rng);
//! assert!(!ops.is_empty());
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod matrix;
pub mod noise;
pub mod op;
pub mod rng;

// Re-exports for convenience
pub use config::{DecompositionConfig, DEFAULT_TOLERANCE};
pub use distribution::DiscreteDistribution;
pub use error::NoiseError;
pub use matrix::Matrix;
pub use noise::{Branch, GateErrorModel, KrausError, NoiseSampler, UnitaryError};
pub use num_complex::Complex64;
pub use op::{NoiseOps, Op, QubitId, Qubits};
pub use rng::RngEngine;

/// Type alias for results in SimQ noise modelling
pub type Result<T> = std::result::Result<T, NoiseError>;
