use std::error::Error;
use std::fmt;

use crate::math::LinalgError;

/// Errors raised while fitting or evaluating a classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// A sample matrix with no rows or no columns.
    EmptyInput,
    /// Number of sample rows and number of labels differ.
    LengthMismatch { samples: usize, labels: usize },
    /// Number of features differs from what the model was built with.
    DimensionMismatch { expected: usize, found: usize },
    InvalidParameter { name: &'static str, reason: String },
    /// Fewer samples than mixture components.
    TooFewSamples { samples: usize, components: usize },
    /// No component count was configured for the given class.
    MissingComponents(String),
    SingularCovariance { component: usize },
    InsufficientNeighbors { k: usize, available: usize },
    NotFitted,
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::EmptyInput => write!(f, "Sample matrix must have at least one row and one column"),
            ClassifierError::LengthMismatch { samples, labels } => write!(
                f,
                "Sample matrix has {} rows but {} labels were given",
                samples, labels
            ),
            ClassifierError::DimensionMismatch { expected, found } => write!(
                f,
                "Expected {} features per sample, found {}",
                expected, found
            ),
            ClassifierError::InvalidParameter { name, reason } => {
                write!(f, "Invalid value for `{}`: {}", name, reason)
            }
            ClassifierError::TooFewSamples { samples, components } => write!(
                f,
                "Cannot fit {} mixture components to {} samples",
                components, samples
            ),
            ClassifierError::MissingComponents(label) => {
                write!(f, "No mixture component count configured for class {}", label)
            }
            ClassifierError::SingularCovariance { component } => write!(
                f,
                "Covariance of mixture component {} is singular",
                component
            ),
            ClassifierError::InsufficientNeighbors { k, available } => write!(
                f,
                "Cannot select k = {} neighbors from {} training samples",
                k, available
            ),
            ClassifierError::NotFitted => write!(f, "Model must be fit before calling predict"),
        }
    }
}

impl Error for ClassifierError {}

impl ClassifierError {
    /// Attributes a linear-algebra failure to a mixture component.
    pub(crate) fn from_linalg(err: LinalgError, component: usize) -> Self {
        match err {
            LinalgError::Singular { .. } => ClassifierError::SingularCovariance { component },
            LinalgError::NotSquare { rows, cols } => ClassifierError::DimensionMismatch {
                expected: rows,
                found: cols,
            },
        }
    }
}
