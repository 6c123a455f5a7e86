use log::info;
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::config::{Algorithm, EmConfig};
use crate::error::ClassifierError;
use crate::labels::{Components, Label, LabelSet};
use crate::metrics::accuracy;
use crate::mixture::{fit_mixture, GaussianMixture};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{argmax_rows, check_features, check_training_shape, normalize_rows};

/// Learned statistics of one class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassProfile {
    /// Fraction of training samples carrying the class label.
    pub prior: f64,
    /// Class-conditional density.
    pub mixture: GaussianMixture,
}

/// Bayes classifier with a full-covariance Gaussian mixture per class.
#[derive(Clone, Debug)]
pub struct BayesClassifier<L: Label> {
    config: EmConfig,
    components: usize,
    labels: Option<LabelSet<L>>,
    profiles: Vec<ClassProfile>,
    n_features: usize,
    training_accuracy: f64,
}

impl<L: Label> BayesClassifier<L> {
    pub fn new(algorithm: Algorithm, inverse: bool) -> Self {
        Self::with_config(EmConfig::new(algorithm, inverse))
    }

    pub fn with_config(config: EmConfig) -> Self {
        Self {
            config,
            components: 1,
            labels: None,
            profiles: Vec::new(),
            n_features: 0,
            training_accuracy: 0.0,
        }
    }

    /// Component count used by [`ClassifierModel::fit`].
    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    pub fn config(&self) -> &EmConfig {
        &self.config
    }

    pub fn classes(&self) -> Option<&[L]> {
        self.labels.as_ref().map(|l| l.as_slice())
    }

    /// Per-class parameters, in the order of [`Self::classes`].
    pub fn profiles(&self) -> &[ClassProfile] {
        &self.profiles
    }

    pub fn training_accuracy(&self) -> f64 {
        self.training_accuracy
    }

    /// Fits one mixture per class and returns the predictions on the training set.
    ///
    /// # Arguments
    ///
    /// * `x` - Training samples, shape `(n, d)`.
    /// * `y` - One label per row of `x`.
    /// * `components` - Mixture component count per class.
    /// * `iterations` - EM iteration budget; ignored (forced to 1) under MLE.
    ///
    /// All previously learned state is replaced. On error the classifier is
    /// left as it was.
    pub fn fit(
        &mut self,
        x: ArrayView2<f64>,
        y: &[L],
        components: &Components<L>,
        iterations: usize,
    ) -> Result<Vec<L>, ClassifierError> {
        check_training_shape(x, y)?;

        let mut config = self.config.clone();
        config.iterations = iterations;
        config.iterations = config.effective_iterations();

        let labels = LabelSet::from_labels(y);
        let n_samples = x.nrows() as f64;
        let mut profiles = Vec::with_capacity(labels.len());

        for (label, rows) in labels.iter().zip(labels.partition(y)) {
            let k = components.for_class(label)?;
            info!(
                "Fitting {} Gaussian component(s) for class {:?} on {} samples ({})",
                k,
                label,
                rows.len(),
                config.algorithm
            );
            let class_x = x.select(Axis(0), &rows);
            let fit = fit_mixture(class_x.view(), k, &config)?;
            profiles.push(ClassProfile {
                prior: rows.len() as f64 / n_samples,
                mixture: fit.mixture,
            });
        }

        let fitted = Self {
            config,
            components: self.components,
            labels: Some(labels),
            profiles,
            n_features: x.ncols(),
            training_accuracy: 0.0,
        };
        let predictions = fitted.predict(x)?;
        *self = Self {
            training_accuracy: accuracy(&predictions, y),
            ..fitted
        };
        info!("Training accuracy: {:.4}", self.training_accuracy);

        Ok(predictions)
    }

    /// Class posteriors `p(class | x)`, shape `(n, C)`, columns in class order.
    pub fn posteriors(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ClassifierError> {
        if self.labels.is_none() {
            return Err(ClassifierError::NotFitted);
        }
        check_features(x, self.n_features)?;

        let mut joint = Array2::zeros((x.nrows(), self.profiles.len()));
        for (c, profile) in self.profiles.iter().enumerate() {
            let conditional =
                profile
                    .mixture
                    .density(x, self.config.inverse, self.config.epsilon)?;
            joint
                .column_mut(c)
                .assign(&conditional.mapv(|p| p * profile.prior));
        }
        Ok(normalize_rows(joint, self.config.epsilon))
    }

    /// Most probable class for every row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        let posteriors = self.posteriors(x)?;
        let labels = self.labels.as_ref().ok_or(ClassifierError::NotFitted)?;
        Ok(labels.decode(&argmax_rows(posteriors.view())))
    }
}

impl<L: Label> Default for BayesClassifier<L> {
    fn default() -> Self {
        Self::new(Algorithm::Mle, true)
    }
}

impl<L: Label> ClassifierModel<L> for BayesClassifier<L> {
    fn fit(&mut self, x: ArrayView2<f64>, y: &[L]) -> Result<(), ClassifierError> {
        let components = Components::Uniform(self.components);
        let iterations = self.config.iterations;
        BayesClassifier::fit(self, x, y, &components, iterations).map(|_| ())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        BayesClassifier::predict(self, x)
    }

    fn name(&self) -> &str {
        "bayes"
    }
}
