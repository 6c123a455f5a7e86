//! Helpers shared by the classifier implementations.
use ndarray::{Array2, ArrayView2};

use crate::error::ClassifierError;

/// Validates a training pair: non-empty samples and one label per row.
pub(crate) fn check_training_shape<L>(x: ArrayView2<f64>, y: &[L]) -> Result<(), ClassifierError> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(ClassifierError::EmptyInput);
    }
    if x.nrows() != y.len() {
        return Err(ClassifierError::LengthMismatch {
            samples: x.nrows(),
            labels: y.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_features(x: ArrayView2<f64>, expected: usize) -> Result<(), ClassifierError> {
    if x.ncols() != expected {
        return Err(ClassifierError::DimensionMismatch {
            expected,
            found: x.ncols(),
        });
    }
    Ok(())
}

/// Turns joint probabilities `p(x, class)` of shape `(n, C)` into posteriors by
/// dividing each row by its evidence plus `epsilon`.
pub(crate) fn normalize_rows(mut joint: Array2<f64>, epsilon: f64) -> Array2<f64> {
    for mut row in joint.rows_mut() {
        let evidence = row.sum() + epsilon;
        row.mapv_inplace(|v| v / evidence);
    }
    joint
}

/// Column index of the maximum of each row; the first maximum wins ties.
pub(crate) fn argmax_rows(scores: ArrayView2<f64>) -> Vec<usize> {
    scores
        .rows()
        .into_iter()
        .map(|row| first_max(row.iter().copied()))
        .collect()
}

/// Index of the first strictly greatest value, `0` for an empty iterator.
pub(crate) fn first_max<I: IntoIterator<Item = f64>>(values: I) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (idx, value) in values.into_iter().enumerate() {
        if value > best_value {
            best_value = value;
            best = idx;
        }
    }
    best
}

/// Largest value of each row.
pub(crate) fn max_rows(scores: ArrayView2<f64>) -> Vec<f64> {
    scores
        .rows()
        .into_iter()
        .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .collect()
}
