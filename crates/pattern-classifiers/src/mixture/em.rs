use log::{debug, warn};
use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::model::GaussianMixture;
use crate::config::{Algorithm, EmConfig};
use crate::error::ClassifierError;

/// Result of fitting a mixture to one sample set.
#[derive(Clone, Debug)]
pub struct MixtureFit {
    pub mixture: GaussianMixture,
    /// Data log-likelihood before every E-step, followed by the value for the
    /// final parameters.
    pub log_likelihood: Vec<f64>,
}

/// Fits a mixture of `n_components` Gaussians to the rows of `x`.
///
/// Components are seeded from a hard partition around randomly drawn samples.
/// With [`Algorithm::Mle`] that partition is turned directly into
/// maximum-likelihood weights, means and covariances. With [`Algorithm::Em`]
/// exactly `config.iterations` E/M passes follow; there is no convergence test.
///
/// # Arguments
///
/// * `x` - Samples, shape `(n, d)`, with `n >= n_components`.
/// * `n_components` - Number of mixture components `K`.
/// * `config` - Algorithm, iteration budget, numerical floors and seed.
pub fn fit_mixture(
    x: ArrayView2<f64>,
    n_components: usize,
    config: &EmConfig,
) -> Result<MixtureFit, ClassifierError> {
    let (n, d) = x.dim();
    if n == 0 || d == 0 {
        return Err(ClassifierError::EmptyInput);
    }
    if n_components == 0 {
        return Err(ClassifierError::InvalidParameter {
            name: "n_components",
            reason: "must be at least 1".to_string(),
        });
    }
    if n < n_components {
        return Err(ClassifierError::TooFewSamples {
            samples: n,
            components: n_components,
        });
    }

    let assignment = seed_partition(x, n_components, config.seed);
    let mut resp = Array2::zeros((n, n_components));
    for (i, &k) in assignment.iter().enumerate() {
        resp[(i, k)] = 1.0;
    }
    let mut mixture = maximization(x, resp.view(), config);

    let mut log_likelihood = Vec::with_capacity(config.effective_iterations() + 1);
    if config.algorithm == Algorithm::Em {
        for iteration in 0..config.iterations {
            let (resp, ll) = expectation(&mixture, x, config)?;
            debug!(
                "EM iteration {}/{}: log-likelihood {:.6}",
                iteration + 1,
                config.iterations,
                ll
            );
            log_likelihood.push(ll);

            let total_mass = resp.sum();
            if total_mass <= config.epsilon {
                warn!(
                    "EM iteration {}: all responsibilities vanished, keeping previous parameters",
                    iteration + 1
                );
                continue;
            }
            mixture = maximization(x, resp.view(), config);
        }
    }
    log_likelihood.push(mixture.log_likelihood(x, config.inverse, config.epsilon)?);

    Ok(MixtureFit {
        mixture,
        log_likelihood,
    })
}

/// Assigns every sample to the nearest of `k` distinct randomly drawn samples.
fn seed_partition(x: ArrayView2<f64>, k: usize, seed: u64) -> Vec<usize> {
    let n = x.nrows();
    if k == 1 {
        return vec![0; n];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let seeds = index::sample(&mut rng, n, k).into_vec();

    x.rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (c, &s) in seeds.iter().enumerate() {
                let dist: f64 = row
                    .iter()
                    .zip(x.row(s).iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            best
        })
        .collect()
}

/// Normalised responsibilities and the log-likelihood of the current parameters.
fn expectation(
    mixture: &GaussianMixture,
    x: ArrayView2<f64>,
    config: &EmConfig,
) -> Result<(Array2<f64>, f64), ClassifierError> {
    let mut resp = mixture.weighted_densities(x, config.inverse, config.epsilon)?;
    let mut ll = 0.0;
    for mut row in resp.rows_mut() {
        let total = row.sum() + config.epsilon;
        ll += total.ln();
        row.mapv_inplace(|v| v / total);
    }
    Ok((resp, ll))
}

/// Re-estimates weights, means and covariances from responsibilities `resp`
/// of shape `(n, K)`.
fn maximization(x: ArrayView2<f64>, resp: ArrayView2<f64>, config: &EmConfig) -> GaussianMixture {
    let (n, d) = x.dim();
    let k = resp.ncols();

    let mass = resp.sum_axis(Axis(0));
    let weights = &mass / n as f64;

    let mut means = resp.t().dot(&x);
    for (c, mut mean) in means.rows_mut().into_iter().enumerate() {
        let denom = mass[c] + config.epsilon;
        mean.mapv_inplace(|v| v / denom);
    }

    let mut covariances = Array3::zeros((k, d, d));
    for c in 0..k {
        if mass[c] <= config.epsilon {
            warn!("mixture component {} has collapsed (responsibility mass {:e})", c, mass[c]);
        }
        let centered = &x - &means.row(c);
        let weighted = &centered * &resp.column(c).insert_axis(Axis(1));
        let mut cov = weighted.t().dot(&centered) / (mass[c] + config.epsilon);
        cov.diag_mut().mapv_inplace(|v| v + config.reg_covar);
        covariances.slice_mut(s![c, .., ..]).assign(&cov);
    }

    GaussianMixture {
        weights,
        means,
        covariances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Algorithm, EmConfig};
    use ndarray::array;

    #[test]
    fn single_component_mle_is_sample_statistics() {
        let x = array![[1.0, 2.0], [3.0, 2.0], [2.0, 5.0], [2.0, 3.0]];
        let config = EmConfig::new(Algorithm::Mle, true);
        let fit = fit_mixture(x.view(), 1, &config).unwrap();
        let gmm = fit.mixture;

        assert!((gmm.weights[0] - 1.0).abs() < 1e-9);
        assert!((gmm.means[(0, 0)] - 2.0).abs() < 1e-9);
        assert!((gmm.means[(0, 1)] - 3.0).abs() < 1e-9);
        // Biased (1/n) covariance plus the ridge.
        let cov = gmm.covariances.slice(s![0, .., ..]);
        assert!((cov[(0, 0)] - (0.5 + config.reg_covar)).abs() < 1e-9);
        assert!((cov[(1, 1)] - (1.5 + config.reg_covar)).abs() < 1e-9);
        assert!((cov[(0, 1)] - 0.0).abs() < 1e-9);
        assert_eq!(fit.log_likelihood.len(), 1);
    }

    #[test]
    fn em_runs_exactly_the_iteration_budget() {
        let x = array![[0.0], [0.1], [0.2], [5.0], [5.1], [5.2]];
        let mut config = EmConfig::new(Algorithm::Em, false);
        config.iterations = 7;
        let fit = fit_mixture(x.view(), 2, &config).unwrap();
        assert_eq!(fit.log_likelihood.len(), 8);
        assert!((fit.mixture.weights.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn too_few_samples_for_components() {
        let x = array![[0.0], [1.0]];
        let config = EmConfig::new(Algorithm::Em, true);
        assert_eq!(
            fit_mixture(x.view(), 3, &config).unwrap_err(),
            ClassifierError::TooFewSamples {
                samples: 2,
                components: 3
            }
        );
    }

    #[test]
    fn zero_components_is_invalid() {
        let x = array![[0.0], [1.0]];
        let config = EmConfig::default();
        assert!(matches!(
            fit_mixture(x.view(), 0, &config),
            Err(ClassifierError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn seed_partition_covers_every_seed() {
        let x = array![[0.0], [0.1], [10.0], [10.1], [20.0], [20.1]];
        let assignment = seed_partition(x.view(), 3, 7);
        assert_eq!(assignment.len(), 6);
        for c in 0..3 {
            assert!(assignment.contains(&c));
        }
    }
}
