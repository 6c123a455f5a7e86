use std::error::Error;
use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// LU factorisation with partial pivoting, `P·A = L·U`.
///
/// `L` (unit diagonal) and `U` are packed into a single matrix. Used to evaluate
/// the determinant, solve linear systems and build explicit inverses of the
/// covariance matrices produced by EM.
#[derive(Clone, Debug, PartialEq)]
pub struct LuDecomposition {
    lu: Array2<f64>,
    perm: Vec<usize>,
    sign: f64,
}

impl LuDecomposition {
    pub fn new(a: ArrayView2<f64>) -> Result<Self, LinalgError> {
        let (rows, cols) = a.dim();
        if rows != cols {
            return Err(LinalgError::NotSquare { rows, cols });
        }

        let n = rows;
        let mut lu = a.to_owned();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut sign = 1.0;

        for col in 0..n {
            let mut pivot_row = col;
            let mut pivot_abs = lu[(col, col)].abs();
            for row in col + 1..n {
                let v = lu[(row, col)].abs();
                if v > pivot_abs {
                    pivot_abs = v;
                    pivot_row = row;
                }
            }

            if pivot_abs <= f64::MIN_POSITIVE || !pivot_abs.is_finite() {
                return Err(LinalgError::Singular { column: col });
            }

            if pivot_row != col {
                for j in 0..n {
                    lu.swap((col, j), (pivot_row, j));
                }
                perm.swap(col, pivot_row);
                sign = -sign;
            }

            let pivot = lu[(col, col)];
            for row in col + 1..n {
                let factor = lu[(row, col)] / pivot;
                lu[(row, col)] = factor;
                for j in col + 1..n {
                    lu[(row, j)] -= factor * lu[(col, j)];
                }
            }
        }

        Ok(Self { lu, perm, sign })
    }

    pub fn dim(&self) -> usize {
        self.perm.len()
    }

    pub fn determinant(&self) -> f64 {
        self.lu.diag().iter().fold(self.sign, |acc, v| acc * v)
    }

    /// Solves `A·x = b` for `x`.
    pub fn solve(&self, b: ArrayView1<f64>) -> Array1<f64> {
        let n = self.dim();
        assert_eq!(b.len(), n, "right-hand side length must match matrix order");

        let mut x: Array1<f64> = self.perm.iter().map(|&p| b[p]).collect();

        // Forward substitution with the unit lower triangle.
        for i in 0..n {
            let mut acc = x[i];
            for j in 0..i {
                acc -= self.lu[(i, j)] * x[j];
            }
            x[i] = acc;
        }

        // Back substitution with the upper triangle.
        for i in (0..n).rev() {
            let mut acc = x[i];
            for j in i + 1..n {
                acc -= self.lu[(i, j)] * x[j];
            }
            x[i] = acc / self.lu[(i, i)];
        }

        x
    }

    pub fn inverse(&self) -> Array2<f64> {
        let n = self.dim();
        let mut inv = Array2::zeros((n, n));
        let mut unit = Array1::zeros(n);
        for col in 0..n {
            unit[col] = 1.0;
            inv.column_mut(col).assign(&self.solve(unit.view()));
            unit[col] = 0.0;
        }
        inv
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    NotSquare { rows: usize, cols: usize },
    /// A pivot vanished while eliminating the given column.
    Singular { column: usize },
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::NotSquare { rows, cols } => {
                write!(f, "matrix of shape ({}, {}) is not square", rows, cols)
            }
            LinalgError::Singular { column } => {
                write!(f, "matrix is singular (zero pivot in column {})", column)
            }
        }
    }
}

impl Error for LinalgError {}
