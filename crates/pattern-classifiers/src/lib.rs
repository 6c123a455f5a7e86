//! pattern-classifiers: statistical pattern classifiers over dense feature
//! matrices.
//!
//! The crate provides a full-covariance Bayes classifier and a naive Bayes
//! classifier, both built on per-class Gaussian mixtures fitted by maximum
//! likelihood or EM, plus non-parametric k-nearest-neighbour and Parzen window
//! classifiers. All models share the [`models::ClassifierModel`] trait and can be
//! built from a serializable [`config::ModelConfig`].
//!
//! Samples are rows of an `ndarray::Array2<f64>`; labels are any hashable type
//! implementing [`labels::Label`]. Classes are ordered by first appearance in the
//! training labels, and every tie between classes resolves to the earlier one.
pub mod config;
pub mod distance;
pub mod error;
pub mod labels;
pub mod math;
pub mod metrics;
pub mod mixture;
pub mod models;
pub mod report;

pub use config::{Algorithm, EmConfig, Kernel, ModelConfig, ModelType};
pub use distance::{DistanceMetric, Metric};
pub use error::ClassifierError;
pub use labels::{Components, Label, LabelSet};
pub use models::{
    build_model, BayesClassifier, ClassifierModel, KnnClassifier, KnnModel, NaiveBayesClassifier,
    ParzenWindow,
};
