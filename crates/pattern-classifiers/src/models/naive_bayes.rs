use anyhow::Context;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use plotly::Plot;
use serde::{Deserialize, Serialize};

use crate::config::{Algorithm, EmConfig};
use crate::error::ClassifierError;
use crate::labels::{Components, Label, LabelSet};
use crate::metrics::{accuracy, roc_curve};
use crate::mixture::{fit_mixture, GaussianMixture};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{
    argmax_rows, check_features, check_training_shape, max_rows, normalize_rows,
};
use crate::report::plots::plot_roc_curves;

/// Per-class statistics under the feature-independence assumption.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NaiveClassProfile {
    pub prior: f64,
    /// One univariate mixture per feature.
    pub features: Vec<GaussianMixture>,
}

/// Naive Bayes classifier whose per-feature class-conditional densities are
/// 1-D Gaussian mixtures.
#[derive(Clone, Debug)]
pub struct NaiveBayesClassifier<L: Label> {
    config: EmConfig,
    components: usize,
    labels: Option<LabelSet<L>>,
    profiles: Vec<NaiveClassProfile>,
    training_accuracy: f64,
    training_scores: Vec<f64>,
    training_targets: Vec<L>,
}

impl<L: Label> NaiveBayesClassifier<L> {
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_config(EmConfig::new(algorithm, true))
    }

    pub fn with_config(config: EmConfig) -> Self {
        Self {
            config,
            components: 1,
            labels: None,
            profiles: Vec::new(),
            training_accuracy: 0.0,
            training_scores: Vec::new(),
            training_targets: Vec::new(),
        }
    }

    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    pub fn classes(&self) -> Option<&[L]> {
        self.labels.as_ref().map(|l| l.as_slice())
    }

    pub fn profiles(&self) -> &[NaiveClassProfile] {
        &self.profiles
    }

    pub fn training_accuracy(&self) -> f64 {
        self.training_accuracy
    }

    /// Maximum posterior of every training sample, the score behind the ROC
    /// diagnostic.
    pub fn training_scores(&self) -> &[f64] {
        &self.training_scores
    }

    /// Fits a univariate mixture for every (class, feature) pair and returns the
    /// predictions on the training set.
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
                "Fitting {} feature mixture(s) with {} component(s) for class {:?} on {} samples",
                x.ncols(),
                k,
                label,
                rows.len()
            );
            let class_x = x.select(Axis(0), &rows);
            let features = class_x
                .axis_iter(Axis(1))
                .enumerate()
                .map(|(j, column)| {
                    debug!("class {:?}, feature {}", label, j);
                    let column = column.insert_axis(Axis(1));
                    fit_mixture(column, k, &config).map(|fit| fit.mixture)
                })
                .collect::<Result<Vec<_>, _>>()?;
            profiles.push(NaiveClassProfile {
                prior: rows.len() as f64 / n_samples,
                features,
            });
        }

        let mut fitted = Self {
            config,
            components: self.components,
            labels: Some(labels),
            profiles,
            training_accuracy: 0.0,
            training_scores: Vec::new(),
            training_targets: y.to_vec(),
        };
        let posteriors = fitted.posteriors(x)?;
        let predictions = fitted.decode(posteriors.view())?;
        fitted.training_scores = max_rows(posteriors.view());
        fitted.training_accuracy = accuracy(&predictions, y);
        *self = fitted;
        info!("Training accuracy: {:.4}", self.training_accuracy);

        Ok(predictions)
    }

    /// Class posteriors, shape `(n, C)`.
    pub fn posteriors(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ClassifierError> {
        if self.labels.is_none() {
            return Err(ClassifierError::NotFitted);
        }
        let n_features = self.profiles.first().map_or(0, |p| p.features.len());
        check_features(x, n_features)?;

        let mut joint = Array2::zeros((x.nrows(), self.profiles.len()));
        for (c, profile) in self.profiles.iter().enumerate() {
            let mut conditional = Array1::<f64>::ones(x.nrows());
            for (column, mixture) in x.axis_iter(Axis(1)).zip(&profile.features) {
                let density = mixture.density(
                    column.insert_axis(Axis(1)),
                    self.config.inverse,
                    self.config.epsilon,
                )?;
                conditional *= &density;
            }
            joint
                .column_mut(c)
                .assign(&conditional.mapv(|p| p * profile.prior));
        }
        Ok(normalize_rows(joint, self.config.epsilon))
    }

    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        let posteriors = self.posteriors(x)?;
        self.decode(posteriors.view())
    }

    /// ROC curves of the training scores.
    ///
    /// With `pos_label` a single curve for that class is drawn, otherwise one
    /// curve per class.
    pub fn roc_plot(&self, pos_label: Option<&L>) -> anyhow::Result<Plot> {
        let labels = self
            .labels
            .as_ref()
            .ok_or(ClassifierError::NotFitted)
            .context("ROC curves are computed from the training scores")?;
        let targets = &self.training_targets;
        let scores = &self.training_scores;

        let curves = match pos_label {
            Some(label) => vec![(format!("{:?}", label), roc_curve(targets, scores, label))],
            None => labels
                .iter()
                .map(|label| (format!("{:?}", label), roc_curve(targets, scores, label)))
                .collect(),
        };
        plot_roc_curves(&curves, "ROC curve")
    }

    fn decode(&self, posteriors: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        let labels = self.labels.as_ref().ok_or(ClassifierError::NotFitted)?;
        Ok(labels.decode(&argmax_rows(posteriors)))
    }
}

impl<L: Label> Default for NaiveBayesClassifier<L> {
    fn default() -> Self {
        Self::new(Algorithm::Mle)
    }
}

impl<L: Label> ClassifierModel<L> for NaiveBayesClassifier<L> {
    fn fit(&mut self, x: ArrayView2<f64>, y: &[L]) -> Result<(), ClassifierError> {
        let components = Components::Uniform(self.components);
        let iterations = self.config.iterations;
        NaiveBayesClassifier::fit(self, x, y, &components, iterations).map(|_| ())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        NaiveBayesClassifier::predict(self, x)
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy() -> (Array2<f64>, Vec<i32>) {
        // Feature 0 separates the classes, feature 1 is shared noise.
        let x = array![
            [0.0, 1.0],
            [0.3, -1.0],
            [-0.2, 0.5],
            [0.1, -0.5],
            [5.0, 0.8],
            [5.2, -0.9],
            [4.9, 0.4],
            [5.1, -0.3],
        ];
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn one_mixture_per_feature_and_class() {
        let (x, y) = toy();
        let mut clf = NaiveBayesClassifier::default();
        let predictions = clf.fit(x.view(), &y, &Components::Uniform(1), 1).unwrap();

        assert_eq!(predictions, y);
        assert_eq!(clf.profiles().len(), 2);
        for profile in clf.profiles() {
            assert_eq!(profile.features.len(), 2);
            for mixture in &profile.features {
                assert_eq!(mixture.n_features(), 1);
            }
        }
        assert_eq!(clf.training_accuracy(), 1.0);
        assert_eq!(clf.training_scores().len(), 8);
    }

    #[test]
    fn posteriors_sum_to_one() {
        let (x, y) = toy();
        let mut clf = NaiveBayesClassifier::default();
        clf.fit(x.view(), &y, &Components::Uniform(1), 1).unwrap();
        let post = clf.posteriors(x.view()).unwrap();
        for row in post.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn roc_plot_requires_fit() {
        let clf: NaiveBayesClassifier<i32> = NaiveBayesClassifier::default();
        assert!(clf.roc_plot(None).is_err());
    }
}
