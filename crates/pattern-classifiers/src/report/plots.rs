use anyhow::ensure;
use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::metrics::RocCurve;

/// Plot one or more ROC curves against the chance diagonal.
///
/// # Arguments
///
/// * `curves` - `(name, curve)` pairs, one trace each
/// * `title` - The title of the plot
///
pub fn plot_roc_curves(curves: &[(String, RocCurve)], title: &str) -> anyhow::Result<Plot> {
    ensure!(!curves.is_empty(), "At least one ROC curve is required");

    let mut plot = Plot::new();
    for (name, curve) in curves {
        ensure!(
            curve.fpr.len() == curve.tpr.len(),
            "ROC curve {} has {} false positive rates but {} true positive rates",
            name,
            curve.fpr.len(),
            curve.tpr.len()
        );
        let trace = Scatter::new(curve.fpr.clone(), curve.tpr.clone())
            .mode(Mode::Lines)
            .name(format!("{} (AUC = {:.3})", name, curve.auc()).as_str());
        plot.add_trace(trace);
    }

    let reference_line = Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .name("Chance")
        .line(Line::new().color("red").dash(DashType::Dash));
    plot.add_trace(reference_line);

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("False positive rate"))
            .y_axis(Axis::new().title("True positive rate")),
    );

    Ok(plot)
}
