//! Single-row inference against a trained model

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::training::{TrainedModel, POSITIVE_LABEL};

/// The four sensor readings a prediction is made from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionInput {
    #[serde(rename = "Min_Temp")]
    pub min_temp: f64,
    #[serde(rename = "Max_Temp")]
    pub max_temp: f64,
    #[serde(rename = "Leakage")]
    pub leakage: f64,
    #[serde(rename = "Electricity")]
    pub electricity: f64,
}

impl PredictionInput {
    /// Look up a reading by its column name
    pub fn feature(&self, name: &str) -> Option<f64> {
        match name {
            "Min_Temp" => Some(self.min_temp),
            "Max_Temp" => Some(self.max_temp),
            "Leakage" => Some(self.leakage),
            "Electricity" => Some(self.electricity),
            _ => None,
        }
    }

    /// Arrange the readings in the model's training-time column order.
    ///
    /// The model must have been fitted on exactly these four columns.
    pub fn to_row(&self, feature_names: &[String]) -> Result<Vec<f64>> {
        let row: Vec<f64> = feature_names
            .iter()
            .filter_map(|name| self.feature(name))
            .collect();

        if row.len() != feature_names.len() || row.len() != crate::data::FEATURE_COLUMNS.len() {
            return Err(PredictorError::InferenceError(format!(
                "The feature names should match those that were passed during fit. \
                 Model was fitted on {:?}, request provides {:?}",
                feature_names,
                crate::data::FEATURE_COLUMNS
            )));
        }
        Ok(row)
    }
}

/// Predicted class and the probability the model assigns to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: f64,
    pub confidence: f64,
}

impl Prediction {
    /// Human-readable downtime flag
    pub fn downtime(&self) -> &'static str {
        if self.label == POSITIVE_LABEL {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Predict one row; confidence is the highest class probability
pub fn predict_one(model: &TrainedModel, input: &PredictionInput) -> Result<Prediction> {
    let row = input.to_row(&model.feature_names)?;
    let x = Array2::from_shape_vec((1, row.len()), row)
        .map_err(|e| PredictorError::InferenceError(e.to_string()))?;

    let label = model.tree.predict(&x)?[0];
    let proba = model.tree.predict_proba(&x)?;
    let confidence = proba.row(0).iter().copied().fold(0.0, f64::max);

    Ok(Prediction { label, confidence })
}
