use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::math::{LinalgError, LuDecomposition};

/// Form in which the covariance enters the quadratic term of the density.
#[derive(Clone, Debug)]
enum Precision {
    /// Explicit inverse covariance.
    Inverse(Array2<f64>),
    /// LU factors of the covariance, solved against per sample.
    Factored(LuDecomposition),
}

/// A multivariate normal density prepared for repeated evaluation.
#[derive(Clone, Debug)]
pub struct GaussianDensity {
    mean: Array1<f64>,
    precision: Precision,
    normalizer: f64,
}

impl GaussianDensity {
    /// Factorises `covariance` once so the density can be evaluated for many
    /// samples. The determinant is floored at zero and `epsilon` is added before
    /// the square root.
    pub fn new(
        mean: ArrayView1<f64>,
        covariance: ArrayView2<f64>,
        inverse: bool,
        epsilon: f64,
    ) -> Result<Self, LinalgError> {
        let lu = LuDecomposition::new(covariance)?;
        let d = mean.len() as f64;
        let det = lu.determinant();
        let normalizer = (det.max(0.0) + epsilon).sqrt() * (2.0 * PI).powf(d / 2.0);

        let precision = if inverse {
            Precision::Inverse(lu.inverse())
        } else {
            Precision::Factored(lu)
        };

        Ok(Self {
            mean: mean.to_owned(),
            precision,
            normalizer,
        })
    }

    /// Squared Mahalanobis distance of `x` from the mean.
    pub fn mahalanobis(&self, x: ArrayView1<f64>) -> f64 {
        let diff = &x - &self.mean;
        match &self.precision {
            Precision::Inverse(p) => diff.dot(&p.dot(&diff)),
            Precision::Factored(lu) => diff.dot(&lu.solve(diff.view())),
        }
    }

    pub fn pdf(&self, x: ArrayView1<f64>) -> f64 {
        (-0.5 * self.mahalanobis(x)).exp() / self.normalizer
    }

    /// Density of every row of `x`.
    pub fn pdf_rows(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.rows().into_iter().map(|row| self.pdf(row)).collect()
    }
}
