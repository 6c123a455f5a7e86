//! Evaluation helpers consumed by the classifiers: accuracy for the stored
//! training diagnostic and the ROC curve behind the naive Bayes report.
use serde::{Deserialize, Serialize};

/// Fraction of positions where `predictions` and `truth` agree.
///
/// Returns `0.0` for empty input.
pub fn accuracy<L: PartialEq>(predictions: &[L], truth: &[L]) -> f64 {
    assert_eq!(
        predictions.len(),
        truth.len(),
        "Predictions and truth must have equal lengths"
    );
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / truth.len() as f64
}

/// Receiver operating characteristic of a scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Score thresholds, decreasing. The first entry is `+inf` for the
    /// `(0, 0)` point.
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Area under the curve by the trapezoidal rule.
    pub fn auc(&self) -> f64 {
        self.fpr
            .windows(2)
            .zip(self.tpr.windows(2))
            .map(|(f, t)| (f[1] - f[0]) * (t[1] + t[0]) / 2.0)
            .sum()
    }
}

/// Computes the ROC curve of `scores` for detecting `pos_label` in `y`.
///
/// One point is emitted per distinct score, so tied scores move the curve
/// diagonally.
pub fn roc_curve<L: PartialEq>(y: &[L], scores: &[f64], pos_label: &L) -> RocCurve {
    assert_eq!(
        y.len(),
        scores.len(),
        "Labels and scores must have equal lengths"
    );

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let positives = y.iter().filter(|l| *l == pos_label).count() as f64;
    let negatives = y.len() as f64 - positives;
    let rate = |count: f64, total: f64| if total > 0.0 { count / total } else { 0.0 };

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];

    let (mut tp, mut fp) = (0.0, 0.0);
    for (pos, &idx) in order.iter().enumerate() {
        if y[idx] == *pos_label {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        let last_of_group = order
            .get(pos + 1)
            .map_or(true, |&next| scores[next] != scores[idx]);
        if last_of_group {
            fpr.push(rate(fp, negatives));
            tpr.push(rate(tp, positives));
            thresholds.push(scores[idx]);
        }
    }

    RocCurve {
        fpr,
        tpr,
        thresholds,
    }
}
