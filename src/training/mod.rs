//! Model training module
//!
//! Provides the seeded train/test split, the decision tree classifier,
//! held-out metrics and the engine tying them together.

mod config;
mod engine;
pub mod decision_tree;
pub mod metrics;
pub mod split;

pub use config::TrainingConfig;
pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use engine::{TrainEngine, TrainedModel, POSITIVE_LABEL};
pub use metrics::{round2, ClassificationMetrics};
pub use split::{train_test_split, TrainTestSplit};
