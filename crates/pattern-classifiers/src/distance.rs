//! Distance metrics for the nearest-neighbour classifier.
//!
//! A metric always provides a pairwise `distance`. Metrics that can evaluate a
//! whole training matrix against one query with broadcast array operations
//! advertise it through [`Metric::supports_batch`]; the classifier checks that
//! capability instead of trying the batched form and recovering from failure.
use std::str::FromStr;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

pub trait Metric {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64;

    fn supports_batch(&self) -> bool {
        false
    }

    /// Rejects parameters that do not define a metric.
    fn validate(&self) -> Result<(), ClassifierError> {
        Ok(())
    }

    /// Distance from every row of `points` to `query`.
    fn batch_distances(&self, points: ArrayView2<f64>, query: ArrayView1<f64>) -> Array1<f64> {
        pairwise_distances(self, points, query)
    }
}

/// Row-by-row evaluation of `metric.distance`.
pub fn pairwise_distances<M: Metric + ?Sized>(
    metric: &M,
    points: ArrayView2<f64>,
    query: ArrayView1<f64>,
) -> Array1<f64> {
    points
        .rows()
        .into_iter()
        .map(|row| metric.distance(row, query))
        .collect()
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(try_from = "UncheckedMetric")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
    /// L∞ distance.
    Chebyshev,
    Minkowski { p: f64 },
    /// `1 - cos(a, b)`; `1.0` when either vector is zero.
    Cosine,
}

fn check_minkowski_order(p: f64) -> Result<f64, String> {
    if p.is_finite() && p >= 1.0 {
        Ok(p)
    } else {
        Err(format!("Minkowski order must be finite and >= 1, got {}", p))
    }
}

/// Wire form of [`DistanceMetric`], checked on conversion.
#[derive(Deserialize)]
enum UncheckedMetric {
    Euclidean,
    Manhattan,
    Chebyshev,
    Minkowski { p: f64 },
    Cosine,
}

impl TryFrom<UncheckedMetric> for DistanceMetric {
    type Error = String;

    fn try_from(raw: UncheckedMetric) -> Result<Self, Self::Error> {
        Ok(match raw {
            UncheckedMetric::Euclidean => DistanceMetric::Euclidean,
            UncheckedMetric::Manhattan => DistanceMetric::Manhattan,
            UncheckedMetric::Chebyshev => DistanceMetric::Chebyshev,
            UncheckedMetric::Minkowski { p } => DistanceMetric::Minkowski {
                p: check_minkowski_order(p)?,
            },
            UncheckedMetric::Cosine => DistanceMetric::Cosine,
        })
    }
}

impl Metric for DistanceMetric {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        assert_eq!(a.len(), b.len(), "Vectors must have the same length");
        let diffs = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs());
        match *self {
            DistanceMetric::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            DistanceMetric::Manhattan => diffs.sum(),
            DistanceMetric::Chebyshev => diffs.fold(0.0, f64::max),
            DistanceMetric::Minkowski { p } => diffs.map(|d| d.powf(p)).sum::<f64>().powf(1.0 / p),
            DistanceMetric::Cosine => {
                let dot = a.dot(&b);
                let norm_a = a.dot(&a).sqrt();
                let norm_b = b.dot(&b).sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    1.0
                } else {
                    1.0 - dot / (norm_a * norm_b)
                }
            }
        }
    }

    fn supports_batch(&self) -> bool {
        !matches!(self, DistanceMetric::Cosine)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        match *self {
            DistanceMetric::Minkowski { p } => check_minkowski_order(p)
                .map(|_| ())
                .map_err(|reason| ClassifierError::InvalidParameter {
                    name: "metric",
                    reason,
                }),
            _ => Ok(()),
        }
    }

    fn batch_distances(&self, points: ArrayView2<f64>, query: ArrayView1<f64>) -> Array1<f64> {
        if !self.supports_batch() {
            return pairwise_distances(self, points, query);
        }
        let diffs = (&points - &query).mapv(f64::abs);
        match *self {
            DistanceMetric::Euclidean => diffs.mapv(|d| d * d).sum_axis(Axis(1)).mapv(f64::sqrt),
            DistanceMetric::Manhattan => diffs.sum_axis(Axis(1)),
            DistanceMetric::Chebyshev => diffs.fold_axis(Axis(1), 0.0_f64, |&m, &d| m.max(d)),
            DistanceMetric::Minkowski { p } => diffs
                .mapv(|d| d.powf(p))
                .sum_axis(Axis(1))
                .mapv(|s| s.powf(1.0 / p)),
            DistanceMetric::Cosine => unreachable!("cosine distance has no batched form"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    /// Parses `euclidean`, `manhattan`, `chebyshev`, `cosine` or `minkowski:<p>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if let Some(p) = lower.strip_prefix("minkowski:") {
            let p: f64 = p
                .trim()
                .parse()
                .map_err(|_| format!("Invalid Minkowski order in {}", s))?;
            return Ok(DistanceMetric::Minkowski {
                p: check_minkowski_order(p)?,
            });
        }
        match lower.as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "manhattan" | "cityblock" => Ok(DistanceMetric::Manhattan),
            "chebyshev" => Ok(DistanceMetric::Chebyshev),
            "cosine" => Ok(DistanceMetric::Cosine),
            _ => Err(format!(
                "Unknown distance metric: {}. Expected one of: euclidean, manhattan, chebyshev, cosine, minkowski:<p>",
                s
            )),
        }
    }
}
