use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::config::Kernel;
use crate::error::ClassifierError;
use crate::labels::{Label, LabelSet};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_features, check_training_shape};

/// Kernel density classifier with a fixed bandwidth `h`.
#[derive(Clone, Debug)]
pub struct ParzenWindow<L: Label> {
    h: f64,
    kernel: Kernel,
    x_train: Array2<f64>,
    classes: Vec<usize>,
    labels: Option<LabelSet<L>>,
}

impl<L: Label> ParzenWindow<L> {
    pub fn new(h: f64, kernel: Kernel) -> Self {
        Self {
            h,
            kernel,
            x_train: Array2::zeros((0, 0)),
            classes: Vec::new(),
            labels: None,
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.h
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn classes(&self) -> Option<&[L]> {
        self.labels.as_ref().map(|l| l.as_slice())
    }

    /// Stores the training samples and their labels.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: &[L]) -> Result<(), ClassifierError> {
        check_training_shape(x, y)?;
        if !(self.h.is_finite() && self.h > 0.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "h",
                reason: format!("bandwidth must be positive and finite, got {}", self.h),
            });
        }
        let labels = LabelSet::from_labels(y);
        self.classes = labels.encode(y).into_iter().flatten().collect();
        self.x_train = x.to_owned();
        self.labels = Some(labels);
        Ok(())
    }

    /// Per-class window scores of `query`: point counts for the hypercube,
    /// summed kernel weights for the Gaussian.
    pub fn class_scores(&self, query: ArrayView1<f64>) -> Result<Array1<f64>, ClassifierError> {
        let labels = self.labels.as_ref().ok_or(ClassifierError::NotFitted)?;
        if query.len() != self.x_train.ncols() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.x_train.ncols(),
                found: query.len(),
            });
        }
        Ok(self.window_scores(query, labels.len()))
    }

    fn window_scores(&self, query: ArrayView1<f64>, n_classes: usize) -> Array1<f64> {
        let diffs = &self.x_train - &query;
        let weights: Array1<f64> = match self.kernel {
            Kernel::Hypercube => {
                let half = self.h / 2.0;
                diffs
                    .mapv(f64::abs)
                    .fold_axis(Axis(1), 0.0_f64, |&m, &d| m.max(d))
                    .mapv(|dist| if dist < half { 1.0 } else { 0.0 })
            }
            Kernel::Gaussian => {
                let two_h_sq = 2.0 * self.h * self.h;
                diffs
                    .mapv(|d| d * d)
                    .sum_axis(Axis(1))
                    .mapv(|sq| (-sq / two_h_sq).exp())
            }
        };

        let mut scores = Array1::zeros(n_classes);
        for (&class, &w) in self.classes.iter().zip(weights.iter()) {
            scores[class] += w;
        }
        scores
    }

    /// Class with the highest window score for every row of `x`.
    ///
    /// A class must strictly beat the running best, which starts at zero with the
    /// first class, so empty windows and ties resolve to the earlier class.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        let labels = self.labels.as_ref().ok_or(ClassifierError::NotFitted)?;
        check_features(x, self.x_train.ncols())?;

        Ok(x.rows()
            .into_iter()
            .map(|query| {
                let scores = self.window_scores(query, labels.len());
                let mut winner = 0;
                let mut best = 0.0;
                for (c, &score) in scores.iter().enumerate() {
                    if score > best {
                        best = score;
                        winner = c;
                    }
                }
                labels.get(winner).clone()
            })
            .collect())
    }
}

impl<L: Label> Default for ParzenWindow<L> {
    fn default() -> Self {
        Self::new(1.0, Kernel::Hypercube)
    }
}

impl<L: Label> ClassifierModel<L> for ParzenWindow<L> {
    fn fit(&mut self, x: ArrayView2<f64>, y: &[L]) -> Result<(), ClassifierError> {
        ParzenWindow::fit(self, x, y)
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        ParzenWindow::predict(self, x)
    }

    fn name(&self) -> &str {
        "parzen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn train() -> (Array2<f64>, Vec<char>) {
        let x = array![[0.0, 0.0], [0.4, 0.0], [3.0, 3.0], [3.2, 3.1], [3.1, 2.9]];
        (x, vec!['a', 'a', 'b', 'b', 'b'])
    }

    #[test]
    fn hypercube_counts_points_inside_window() {
        let (x, y) = train();
        let mut parzen = ParzenWindow::new(1.0, Kernel::Hypercube);
        parzen.fit(x.view(), &y).unwrap();
        assert_eq!(parzen.class_scores(array![0.2, 0.0].view()).unwrap().to_vec(), vec![2.0, 0.0]);
        assert_eq!(parzen.class_scores(array![3.1, 3.0].view()).unwrap().to_vec(), vec![0.0, 3.0]);
    }

    #[test]
    fn empty_window_defaults_to_first_class() {
        let (x, y) = train();
        let mut parzen = ParzenWindow::new(0.5, Kernel::Hypercube);
        parzen.fit(x.view(), &y).unwrap();
        assert_eq!(parzen.predict(array![[100.0, -100.0]].view()).unwrap(), vec!['a']);
    }

    #[test]
    fn gaussian_kernel_weighs_distance() {
        let (x, y) = train();
        let mut parzen = ParzenWindow::new(1.0, Kernel::Gaussian);
        parzen.fit(x.view(), &y).unwrap();
        let scores = parzen.class_scores(array![0.0, 0.0].view()).unwrap();
        // exp(0) + exp(-0.16 / 2)
        assert!((scores[0] - (1.0 + (-0.08f64).exp())).abs() < 1e-12);
        assert_eq!(parzen.predict(array![[0.0, 0.0], [3.0, 3.0]].view()).unwrap(), vec!['a', 'b']);
    }

    #[test]
    fn gaussian_underflow_defaults_to_first_class() {
        let (x, y) = train();
        let mut parzen = ParzenWindow::new(0.01, Kernel::Gaussian);
        parzen.fit(x.view(), &y).unwrap();
        let far = array![[50.0, 50.0]];
        assert_eq!(parzen.class_scores(far.row(0)).unwrap().to_vec(), vec![0.0, 0.0]);
        assert_eq!(parzen.predict(far.view()).unwrap(), vec!['a']);
    }

    #[test]
    fn window_tie_goes_to_first_seen_class() {
        let x = array![[1.0, 0.0], [-1.0, 0.0], [10.0, 10.0]];
        let y = ['b', 'a', 'a'];
        let mut parzen = ParzenWindow::new(3.0, Kernel::Hypercube);
        parzen.fit(x.view(), &y).unwrap();
        let query = array![[0.0, 0.0]];
        assert_eq!(parzen.class_scores(query.row(0)).unwrap().to_vec(), vec![1.0, 1.0]);
        assert_eq!(parzen.predict(query.view()).unwrap(), vec!['b']);
    }

    #[test]
    fn class_scores_check_fit_and_shape() {
        let unfitted: ParzenWindow<char> = ParzenWindow::default();
        assert_eq!(
            unfitted.class_scores(array![0.0, 0.0].view()),
            Err(ClassifierError::NotFitted)
        );

        let (x, y) = train();
        let mut parzen = ParzenWindow::default();
        parzen.fit(x.view(), &y).unwrap();
        assert_eq!(
            parzen.class_scores(array![0.0, 0.0, 0.0].view()),
            Err(ClassifierError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn non_positive_bandwidth_is_rejected() {
        let (x, y) = train();
        let mut parzen = ParzenWindow::new(0.0, Kernel::Gaussian);
        assert!(matches!(
            parzen.fit(x.view(), &y),
            Err(ClassifierError::InvalidParameter { name: "h", .. })
        ));
    }

    #[test]
    fn predict_before_fit_fails() {
        let parzen: ParzenWindow<char> = ParzenWindow::default();
        assert_eq!(
            parzen.predict(array![[0.0, 0.0]].view()),
            Err(ClassifierError::NotFitted)
        );
    }
}
