use ndarray::ArrayView2;

use crate::error::ClassifierError;

/// Common contract of the classifiers in this crate, so callers can hold any of
/// them as a `Box<dyn ClassifierModel<L>>` built from a `ModelConfig`.
pub trait ClassifierModel<L> {
    /// Learn from `x` (one sample per row) and its labels `y`.
    fn fit(&mut self, x: ArrayView2<f64>, y: &[L]) -> Result<(), ClassifierError>;

    /// Predict one label per row of `x`.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
