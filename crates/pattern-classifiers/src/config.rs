use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::distance::DistanceMetric;

/// Floor added to every density normalizer and determinant.
pub const EPSILON: f64 = 1e-10;

/// Ridge added to the diagonal of every covariance re-estimated by EM.
pub const REG_COVAR: f64 = 1e-6;

pub const DEFAULT_ITERATIONS: usize = 100;

/// How mixture parameters are estimated.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Direct maximum-likelihood estimate from the seeded partition.
    #[default]
    #[serde(rename = "MLE")]
    Mle,
    /// Fixed-budget Expectation-Maximization.
    #[serde(rename = "EM")]
    Em,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Mle => write!(f, "MLE"),
            Algorithm::Em => write!(f, "EM"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mle" => Ok(Algorithm::Mle),
            "em" => Ok(Algorithm::Em),
            _ => Err(format!("Unknown algorithm: {}. Expected one of: MLE, EM", s)),
        }
    }
}

/// Window function used by the Parzen classifier.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kernel {
    #[default]
    Hypercube,
    Gaussian,
}

impl FromStr for Kernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hypercube" => Ok(Kernel::Hypercube),
            "gaussian" => Ok(Kernel::Gaussian),
            _ => Err(format!(
                "Unknown kernel: {}. Expected one of: Hypercube, Gaussian",
                s
            )),
        }
    }
}

/// Settings for a single EM run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EmConfig {
    pub algorithm: Algorithm,
    pub iterations: usize,
    /// Evaluate densities through the explicit inverse covariance instead of
    /// solving against its LU factors.
    pub inverse: bool,
    pub epsilon: f64,
    pub reg_covar: f64,
    pub seed: u64,
}

impl EmConfig {
    pub fn new(algorithm: Algorithm, inverse: bool) -> Self {
        Self {
            algorithm,
            inverse,
            ..Self::default()
        }
    }

    /// Number of passes actually run; MLE always makes exactly one.
    pub fn effective_iterations(&self) -> usize {
        match self.algorithm {
            Algorithm::Mle => 1,
            Algorithm::Em => self.iterations,
        }
    }
}

impl Default for EmConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Mle,
            iterations: DEFAULT_ITERATIONS,
            inverse: true,
            epsilon: EPSILON,
            reg_covar: REG_COVAR,
            seed: 42,
        }
    }
}

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    pub epsilon: f64,
    pub seed: u64,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    NaiveBayes {
        algorithm: Algorithm,
        components: usize,
        iterations: usize,
    },
    Bayes {
        algorithm: Algorithm,
        components: usize,
        iterations: usize,
        inverse: bool,
    },
    Knn {
        metric: DistanceMetric,
        k: usize,
    },
    Parzen {
        kernel: Kernel,
        h: f64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Bayes {
            algorithm: Algorithm::Mle,
            components: 1,
            iterations: DEFAULT_ITERATIONS,
            inverse: true,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bayes" => Ok(ModelType::default()),
            "naive_bayes" | "naivebayes" | "nb" => Ok(ModelType::NaiveBayes {
                algorithm: Algorithm::Mle,
                components: 1,
                iterations: DEFAULT_ITERATIONS,
            }),
            "knn" => Ok(ModelType::Knn {
                metric: DistanceMetric::Euclidean,
                k: 5,
            }),
            "parzen" => Ok(ModelType::Parzen {
                kernel: Kernel::Hypercube,
                h: 1.0,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Expected one of: bayes, naive_bayes, knn, parzen",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self {
            model_type,
            ..Self::default()
        }
    }

    /// EM settings for the mixture-based model types.
    pub fn em_config(&self) -> Option<EmConfig> {
        let (algorithm, iterations, inverse) = match self.model_type {
            ModelType::NaiveBayes {
                algorithm,
                iterations,
                ..
            } => (algorithm, iterations, true),
            ModelType::Bayes {
                algorithm,
                iterations,
                inverse,
                ..
            } => (algorithm, iterations, inverse),
            ModelType::Knn { .. } | ModelType::Parzen { .. } => return None,
        };
        Some(EmConfig {
            algorithm,
            iterations,
            inverse,
            epsilon: self.epsilon,
            reg_covar: REG_COVAR,
            seed: self.seed,
        })
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            seed: 42,
            model_type: ModelType::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mle_runs_a_single_pass() {
        let mut config = EmConfig::new(Algorithm::Mle, true);
        config.iterations = 50;
        assert_eq!(config.effective_iterations(), 1);
        config.algorithm = Algorithm::Em;
        assert_eq!(config.effective_iterations(), 50);
    }

    #[test]
    fn algorithm_parses_case_insensitively() {
        assert_eq!("mle".parse::<Algorithm>(), Ok(Algorithm::Mle));
        assert_eq!("EM".parse::<Algorithm>(), Ok(Algorithm::Em));
        assert!("kmeans".parse::<Algorithm>().is_err());
    }

    #[test]
    fn em_config_only_for_mixture_models() {
        let knn = ModelConfig::new("knn".parse().unwrap());
        assert!(knn.em_config().is_none());

        let bayes = ModelConfig::new(ModelType::Bayes {
            algorithm: Algorithm::Em,
            components: 2,
            iterations: 10,
            inverse: false,
        });
        let em = bayes.em_config().unwrap();
        assert_eq!(em.algorithm, Algorithm::Em);
        assert_eq!(em.iterations, 10);
        assert!(!em.inverse);
        assert_eq!(em.epsilon, EPSILON);
    }
}
