//! Qubit addressing and the operations produced by noise sampling

use crate::Matrix;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Type-safe identifier for a qubit
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

/// Qubit register targeted by an operation (most gates touch 1-2 qubits)
pub type Qubits = SmallVec<[QubitId; 2]>;

/// Operations emitted in place of a noisy gate
///
/// The simulation engine consumes these immediately; matrices are shared
/// behind `Arc` so sampling never copies operator data.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// An ideal gate, passed through untouched
    Gate { name: Arc<str>, qubits: Qubits },

    /// A unitary matrix applied to the qubits
    Unitary { qubits: Qubits, matrix: Arc<Matrix> },

    /// A general Kraus channel applied to the qubits
    Kraus {
        qubits: Qubits,
        operators: Arc<[Matrix]>,
    },
}

impl Op {
    /// Create an ideal gate operation
    pub fn gate(name: impl Into<Arc<str>>, qubits: &[QubitId]) -> Self {
        Self::Gate {
            name: name.into(),
            qubits: SmallVec::from_slice(qubits),
        }
    }

    /// Create a unitary matrix operation
    pub fn unitary(matrix: Arc<Matrix>, qubits: &[QubitId]) -> Self {
        Self::Unitary {
            qubits: SmallVec::from_slice(qubits),
            matrix,
        }
    }

    /// Create a Kraus channel operation
    pub fn kraus(operators: Arc<[Matrix]>, qubits: &[QubitId]) -> Self {
        Self::Kraus {
            qubits: SmallVec::from_slice(qubits),
            operators,
        }
    }

    /// Short name of the operation
    pub fn name(&self) -> &str {
        match self {
            Self::Gate { name, .. } => &**name,
            Self::Unitary { .. } => "unitary",
            Self::Kraus { .. } => "kraus",
        }
    }

    /// Qubits the operation acts on
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Self::Gate { qubits, .. } | Self::Unitary { qubits, .. } | Self::Kraus { qubits, .. } => {
                qubits.as_slice()
            },
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (i, q) in self.qubits().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        write!(f, ")")
    }
}

/// Sequence of operations replacing one gate execution
pub type NoiseOps = Vec<Op>;
