//! Training configuration

use serde::{Deserialize, Serialize};

use crate::data::TARGET_COLUMN;

/// Configuration for fitting the downtime classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Label column
    pub target_column: String,
    /// Fraction of rows held out for scoring
    pub test_size: f64,
    /// Seed shared by the split and the tree
    pub random_seed: u64,
    /// Maximum tree depth (unbounded when `None`)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples in each leaf
    pub min_samples_leaf: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target_column: TARGET_COLUMN.to_string(),
            test_size: 0.2,
            random_seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TrainingConfig {
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }
}
