use ndarray::{s, Array1, Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::gaussian::GaussianDensity;
use crate::error::ClassifierError;

/// Parameters of a mixture of `K` Gaussians over `d` features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianMixture {
    /// Mixture weights, shape `(K,)`.
    pub weights: Array1<f64>,
    /// Component means, shape `(K, d)`.
    pub means: Array2<f64>,
    /// Component covariances, shape `(K, d, d)`.
    pub covariances: Array3<f64>,
}

impl GaussianMixture {
    pub fn n_components(&self) -> usize {
        self.weights.len()
    }

    pub fn n_features(&self) -> usize {
        self.means.ncols()
    }

    pub(crate) fn component_densities(
        &self,
        inverse: bool,
        epsilon: f64,
    ) -> Result<Vec<GaussianDensity>, ClassifierError> {
        (0..self.n_components())
            .map(|k| {
                GaussianDensity::new(
                    self.means.row(k),
                    self.covariances.slice(s![k, .., ..]),
                    inverse,
                    epsilon,
                )
                .map_err(|e| ClassifierError::from_linalg(e, k))
            })
            .collect()
    }

    /// `weight_k · N(x_i | mean_k, cov_k)` for every sample `i` and component `k`,
    /// shape `(n, K)`.
    pub fn weighted_densities(
        &self,
        x: ArrayView2<f64>,
        inverse: bool,
        epsilon: f64,
    ) -> Result<Array2<f64>, ClassifierError> {
        if x.ncols() != self.n_features() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features(),
                found: x.ncols(),
            });
        }

        let densities = self.component_densities(inverse, epsilon)?;
        let mut out = Array2::zeros((x.nrows(), self.n_components()));
        for (k, density) in densities.iter().enumerate() {
            let weight = self.weights[k];
            out.column_mut(k)
                .assign(&density.pdf_rows(x).mapv(|p| weight * p));
        }
        Ok(out)
    }

    /// Mixture density of every row of `x`.
    pub fn density(
        &self,
        x: ArrayView2<f64>,
        inverse: bool,
        epsilon: f64,
    ) -> Result<Array1<f64>, ClassifierError> {
        Ok(self
            .weighted_densities(x, inverse, epsilon)?
            .sum_axis(Axis(1)))
    }

    /// `Σ_i ln(p(x_i) + epsilon)`.
    pub fn log_likelihood(
        &self,
        x: ArrayView2<f64>,
        inverse: bool,
        epsilon: f64,
    ) -> Result<f64, ClassifierError> {
        Ok(self
            .density(x, inverse, epsilon)?
            .iter()
            .map(|p| (p + epsilon).ln())
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EPSILON;
    use ndarray::array;

    fn two_component_1d() -> GaussianMixture {
        GaussianMixture {
            weights: array![0.25, 0.75],
            means: array![[0.0], [5.0]],
            covariances: array![[[1.0]], [[1.0]]],
        }
    }

    #[test]
    fn mixture_density_is_weighted_sum() {
        let gmm = two_component_1d();
        let x = array![[0.0], [5.0]];
        let weighted = gmm.weighted_densities(x.view(), true, EPSILON).unwrap();
        let peak = 1.0 / (2.0 * std::f64::consts::PI).sqrt();
        assert!((weighted[(0, 0)] - 0.25 * peak).abs() < 1e-9);
        assert!((weighted[(1, 1)] - 0.75 * peak).abs() < 1e-9);

        let density = gmm.density(x.view(), true, EPSILON).unwrap();
        assert!((density[0] - weighted.row(0).sum()).abs() < 1e-15);
    }

    #[test]
    fn wrong_feature_count_is_rejected() {
        let gmm = two_component_1d();
        let x = array![[0.0, 1.0]];
        assert_eq!(
            gmm.density(x.view(), true, EPSILON),
            Err(ClassifierError::DimensionMismatch {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn singular_component_is_reported() {
        let gmm = GaussianMixture {
            weights: array![0.5, 0.5],
            means: array![[0.0, 0.0], [1.0, 1.0]],
            covariances: array![[[1.0, 0.0], [0.0, 1.0]], [[1.0, 1.0], [1.0, 1.0]]],
        };
        let x = array![[0.0, 0.0]];
        assert_eq!(
            gmm.density(x.view(), true, EPSILON),
            Err(ClassifierError::SingularCovariance { component: 1 })
        );
    }
}
