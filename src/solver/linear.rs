//! Dense linear system and LU solver.

use log::debug;

use crate::error::{CircuitError, Result};

use super::SINGULAR_TOLERANCE;

/// A dense square system `A x = b` (row-major).
#[derive(Debug, Clone)]
pub struct LinearSystem {
    a: Vec<f64>,
    b: Vec<f64>,
    size: usize,
}

impl LinearSystem {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            b: vec![0.0; size],
            size,
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Get right-hand-side element.
    pub fn rhs(&self, row: usize) -> f64 {
        self.b[row]
    }

    /// Add to right-hand-side element.
    pub fn add_rhs(&mut self, row: usize, value: f64) {
        self.b[row] += value;
    }

    /// Overwrite a whole row and its right-hand side (used for voltage
    /// constraint rows in node analysis).
    pub fn set_row(&mut self, row: usize, coeffs: &[f64], rhs: f64) {
        self.a[row * self.size..(row + 1) * self.size].copy_from_slice(coeffs);
        self.b[row] = rhs;
    }

    /// Factor with partial pivoting and solve.
    ///
    /// The determinant falls out of the pivot product; if its magnitude is
    /// below [`SINGULAR_TOLERANCE`] the system is reported as singular
    /// instead of returning an unreliable solution. The tolerance is a
    /// fixed absolute constant for reproducibility.
    pub fn solve(mut self) -> Result<Vec<f64>> {
        let n = self.size;
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut pivots: Vec<usize> = (0..n).collect();
        let mut parity = 1.0f64;

        for k in 0..n {
            let mut max_val = self.a[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = self.a[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val == 0.0 {
                // An exactly zero pivot column: determinant is zero.
                return Err(singular_error(0.0));
            }

            if max_row != k {
                pivots.swap(k, max_row);
                for j in 0..n {
                    self.a.swap(k * n + j, max_row * n + j);
                }
                parity = -parity;
            }

            let pivot = self.a[k * n + k];
            for i in (k + 1)..n {
                let factor = self.a[i * n + k] / pivot;
                self.a[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.a[i * n + j] -= factor * self.a[k * n + j];
                }
            }
        }

        let mut determinant = parity;
        for i in 0..n {
            determinant *= self.a[i * n + i];
        }
        debug!("linear solve: n={} determinant={:e}", n, determinant);
        if determinant.abs() < SINGULAR_TOLERANCE {
            return Err(singular_error(determinant));
        }

        // Apply the pivot permutation to b.
        let mut x: Vec<f64> = (0..n).map(|i| self.b[pivots[i]]).collect();

        // Forward substitution (L y = Pb).
        for i in 0..n {
            for j in 0..i {
                x[i] -= self.a[i * n + j] * x[j];
            }
        }

        // Back substitution (U x = y).
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                x[i] -= self.a[i * n + j] * x[j];
            }
            x[i] /= self.a[i * n + i];
        }

        Ok(x)
    }
}

fn singular_error(determinant: f64) -> CircuitError {
    CircuitError::singular(format!(
        "coefficient matrix determinant {determinant:e} is within {SINGULAR_TOLERANCE:e} of zero; \
         check for parallel ideal sources or shorted loops"
    ))
}
