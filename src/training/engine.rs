//! Training engine: dataset in, fitted and scored model out

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::data::Dataset;
use crate::error::{PredictorError, Result};

use super::decision_tree::DecisionTree;
use super::metrics::ClassificationMetrics;
use super::split::train_test_split;
use super::TrainingConfig;

/// Label treated as the positive ("downtime") class
pub const POSITIVE_LABEL: f64 = 1.0;

/// A fitted classifier plus what is needed to serve it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub tree: DecisionTree,
    /// Feature columns in the order the tree was fitted on
    pub feature_names: Vec<String>,
    pub target_column: String,
    /// Scores on the held-out partition
    pub metrics: ClassificationMetrics,
    pub trained_at: DateTime<Utc>,
}

/// Fits a [`TrainedModel`] from a [`Dataset`]
#[derive(Debug, Clone, Default)]
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Split, fit on the training partition and score on the held-out one
    pub fn fit(&self, dataset: &Dataset) -> Result<TrainedModel> {
        let start = Instant::now();

        let (feature_names, x, y) = dataset.to_arrays(&self.config.target_column)?;
        let split = train_test_split(&x, &y, self.config.test_size, self.config.random_seed)?;
        debug!(
            train_rows = split.x_train.nrows(),
            test_rows = split.x_test.nrows(),
            "Split dataset"
        );

        let mut tree = DecisionTree::new()
            .with_min_samples_split(self.config.min_samples_split)
            .with_min_samples_leaf(self.config.min_samples_leaf)
            .with_random_state(self.config.random_seed);
        if let Some(depth) = self.config.max_depth {
            tree = tree.with_max_depth(depth);
        }
        tree.fit(&split.x_train, &split.y_train)
            .map_err(|e| PredictorError::TrainingError(e.to_string()))?;

        let y_pred = tree.predict(&split.x_test)?;
        let metrics = ClassificationMetrics::compute(&split.y_test, &y_pred, POSITIVE_LABEL)?;

        info!(
            rows = x.nrows(),
            features = feature_names.len(),
            depth = tree.get_depth(),
            leaves = tree.get_n_leaves(),
            accuracy = metrics.accuracy,
            f1_score = metrics.f1_score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Decision tree fitted"
        );

        Ok(TrainedModel {
            tree,
            feature_names,
            target_column: self.config.target_column.clone(),
            metrics,
            trained_at: Utc::now(),
        })
    }
}
