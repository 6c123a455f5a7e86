use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::distance::{pairwise_distances, DistanceMetric, Metric};
use crate::error::ClassifierError;
use crate::labels::{Label, LabelSet};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_features, check_training_shape};

/// Majority vote among the `k` nearest training samples.
///
/// Training data is supplied with every call to [`KnnClassifier::predict`];
/// [`KnnModel`] stores it for use behind the [`ClassifierModel`] trait.
#[derive(Clone, Debug)]
pub struct KnnClassifier<M: Metric = DistanceMetric> {
    metric: M,
    batching: bool,
}

impl<M: Metric> KnnClassifier<M> {
    pub fn new(metric: M) -> Self {
        Self {
            metric,
            batching: true,
        }
    }

    /// Allows or forbids the batched distance evaluation. Metrics without a
    /// batched form always use the pairwise loop.
    pub fn with_batching(mut self, batching: bool) -> Self {
        self.batching = batching;
        self
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn uses_batch(&self) -> bool {
        self.batching && self.metric.supports_batch()
    }

    /// Predicts a label for every row of `x_test`.
    ///
    /// The `k` nearest neighbours are found by partial selection, so ties in
    /// distance are broken in whatever order the selection leaves them. Vote
    /// ties go to the class seen first in `y_train`.
    pub fn predict<L: Label>(
        &self,
        x_train: ArrayView2<f64>,
        y_train: &[L],
        x_test: ArrayView2<f64>,
        k: usize,
    ) -> Result<Vec<L>, ClassifierError> {
        check_training_shape(x_train, y_train)?;
        check_features(x_test, x_train.ncols())?;
        self.metric.validate()?;
        let available = x_train.nrows();
        if k == 0 || k > available {
            return Err(ClassifierError::InsufficientNeighbors { k, available });
        }

        let labels = LabelSet::from_labels(y_train);
        let classes: Vec<usize> = labels.encode(y_train).into_iter().flatten().collect();
        let batched = self.uses_batch();
        debug!(
            "kNN: {} queries against {} samples, k = {}, batched = {}",
            x_test.nrows(),
            available,
            k,
            batched
        );

        let mut order: Vec<usize> = Vec::with_capacity(available);
        let predictions = x_test
            .rows()
            .into_iter()
            .map(|query| {
                let distances = self.distances(x_train, query, batched);
                order.clear();
                order.extend(0..available);
                order.select_nth_unstable_by(k - 1, |&a, &b| {
                    distances[a].total_cmp(&distances[b])
                });

                let mut counts = vec![0usize; labels.len()];
                for &row in &order[..k] {
                    counts[classes[row]] += 1;
                }
                let mut winner = 0;
                for (c, &count) in counts.iter().enumerate().skip(1) {
                    if count > counts[winner] {
                        winner = c;
                    }
                }
                labels.get(winner).clone()
            })
            .collect();

        Ok(predictions)
    }

    fn distances(&self, x_train: ArrayView2<f64>, query: ArrayView1<f64>, batched: bool) -> Array1<f64> {
        if batched {
            self.metric.batch_distances(x_train, query)
        } else {
            pairwise_distances(&self.metric, x_train, query)
        }
    }
}

impl Default for KnnClassifier<DistanceMetric> {
    fn default() -> Self {
        Self::new(DistanceMetric::Euclidean)
    }
}

/// A [`KnnClassifier`] bundled with its training data and `k`.
#[derive(Clone, Debug)]
pub struct KnnModel<L: Label, M: Metric = DistanceMetric> {
    classifier: KnnClassifier<M>,
    k: usize,
    train: Option<(Array2<f64>, Vec<L>)>,
}

impl<L: Label, M: Metric> KnnModel<L, M> {
    pub fn new(classifier: KnnClassifier<M>, k: usize) -> Self {
        Self {
            classifier,
            k,
            train: None,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl<L: Label, M: Metric> ClassifierModel<L> for KnnModel<L, M> {
    fn fit(&mut self, x: ArrayView2<f64>, y: &[L]) -> Result<(), ClassifierError> {
        check_training_shape(x, y)?;
        self.classifier.metric().validate()?;
        if self.k == 0 || self.k > x.nrows() {
            return Err(ClassifierError::InsufficientNeighbors {
                k: self.k,
                available: x.nrows(),
            });
        }
        self.train = Some((x.to_owned(), y.to_vec()));
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<L>, ClassifierError> {
        let (x_train, y_train) = self.train.as_ref().ok_or(ClassifierError::NotFitted)?;
        self.classifier.predict(x_train.view(), y_train, x, self.k)
    }

    fn name(&self) -> &str {
        "knn"
    }
}
