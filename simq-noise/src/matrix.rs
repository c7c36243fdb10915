//! Dense complex matrices and numerical predicates
//!
//! Matrices are stored as flattened row-major vectors, the same layout used for
//! gate matrices throughout SimQ. Every predicate takes its tolerance as an
//! explicit argument; there is no hidden default.
//!
//! # Example
//!
//! ```rust
//! use simq_noise::Matrix;
//! use num_complex::Complex64;
//!
//! let x = Matrix::from_rows(&[
//!     [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
//!     [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
//! ]);
//!
//! assert!(x.is_unitary(1e-10));
//! assert!(!x.is_identity(1e-10));
//! assert!(x.matmul(&x).is_identity(1e-10));
//! ```

use crate::{NoiseError, Result};
use num_complex::Complex64;
use std::fmt;

/// A dense complex matrix in row-major order
#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Complex64>,
}

impl Matrix {
    /// Create a matrix from flattened row-major data
    ///
    /// # Errors
    /// Returns [`NoiseError::ShapeMismatch`] if `data.len() != rows * cols`
    pub fn new(rows: usize, cols: usize, data: Vec<Complex64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(NoiseError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from an array of rows
    pub fn from_rows<const R: usize, const C: usize>(rows: &[[Complex64; C]; R]) -> Self {
        Self {
            rows: R,
            cols: C,
            data: rows.iter().flat_map(|row| row.iter().copied()).collect(),
        }
    }

    /// Create a zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Complex64::new(0.0, 0.0); rows * cols],
        }
    }

    /// Create an `n × n` identity matrix
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.data[i * n + i] = Complex64::new(1.0, 0.0);
        }
        matrix
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flattened row-major elements
    #[inline]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Get the element at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.cols + col]
    }

    /// Whether the matrix is square
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Compute the adjoint (conjugate transpose)
    pub fn adjoint(&self) -> Self {
        let mut result = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result.data[j * self.rows + i] = self.data[i * self.cols + j].conj();
            }
        }
        result
    }

    /// Matrix product `self * other`
    ///
    /// # Panics
    /// Panics if the inner dimensions don't agree.
    pub fn matmul(&self, other: &Self) -> Self {
        assert_eq!(
            self.cols, other.rows,
            "Inner dimensions must agree for matrix multiplication"
        );

        let mut result = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == Complex64::new(0.0, 0.0) {
                    continue;
                }
                for j in 0..other.cols {
                    result.data[i * other.cols + j] += a * other.data[k * other.cols + j];
                }
            }
        }
        result
    }

    /// Multiply every element by a scalar
    pub fn scale(&self, factor: impl Into<Complex64>) -> Self {
        let factor = factor.into();
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| x * factor).collect(),
        }
    }

    /// Element-wise `self += other`
    ///
    /// # Panics
    /// Panics if the shapes differ.
    pub fn add_assign(&mut self, other: &Self) {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "Matrix shapes must match for addition"
        );
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += *b;
        }
    }

    /// Squared norm of a row, Σⱼ |Mᵢⱼ|²
    ///
    /// This equals the diagonal entry `(M M†)ᵢᵢ`.
    pub fn row_norm_sqr(&self, row: usize) -> f64 {
        self.data[row * self.cols..(row + 1) * self.cols]
            .iter()
            .map(|x| x.norm_sqr())
            .sum()
    }

    /// Largest element-wise distance `|Mᵢⱼ - δᵢⱼ|` from the identity
    ///
    /// Returns infinity for non-square matrices.
    pub fn max_deviation_from_identity(&self) -> f64 {
        if !self.is_square() {
            return f64::INFINITY;
        }
        let n = self.rows;
        let mut max = 0.0_f64;
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j {
                    Complex64::new(1.0, 0.0)
                } else {
                    Complex64::new(0.0, 0.0)
                };
                max = max.max((self.data[i * n + j] - expected).norm());
            }
        }
        max
    }

    /// Check if the matrix is the identity within `tolerance`
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.max_deviation_from_identity() <= tolerance
    }

    /// Check if the matrix is unitary (U†U = I) within `tolerance`
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.is_square() && self.adjoint().matmul(self).is_identity(tolerance)
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix({}×{})[", self.rows, self.cols)?;
        for i in 0..self.rows {
            if i > 0 {
                write!(f, "; ")?;
            }
            for j in 0..self.cols {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.get(i, j))?;
            }
        }
        write!(f, "]")
    }
}
