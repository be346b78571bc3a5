//! Held-out classification metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Metrics for a binary classifier scored against a positive label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of held-out rows scored
    pub n_samples: usize,
}

impl ClassificationMetrics {
    /// Score predictions against the truth.
    ///
    /// Fails when the labels seen in `y_true` and `y_pred` together form a
    /// binary problem that does not include `pos_label`. Precision, recall
    /// and F1 fall back to 0 when their denominators are zero.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>, pos_label: f64) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PredictorError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(PredictorError::ValidationError(
                "cannot score an empty partition".to_string(),
            ));
        }

        let mut labels: Vec<f64> = y_true.iter().chain(y_pred.iter()).copied().collect();
        labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        labels.dedup();
        if labels.len() > 2 {
            return Err(PredictorError::ValidationError(format!(
                "expected a binary problem, found labels {:?}",
                labels
            )));
        }
        if labels.len() == 2 && !labels.contains(&pos_label) {
            return Err(PredictorError::ValidationError(format!(
                "pos_label={} is not a valid label. It should be one of {:?}",
                pos_label, labels
            )));
        }

        let correct = y_true.iter().zip(y_pred.iter()).filter(|(t, p)| t == p).count();

        let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t == pos_label, p == pos_label) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1_score = ratio(2 * tp, 2 * tp + fp + fn_);

        Ok(Self {
            accuracy: correct as f64 / y_true.len() as f64,
            precision,
            recall,
            f1_score,
            n_samples: y_true.len(),
        })
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Round to two decimal places for API responses, halves to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
