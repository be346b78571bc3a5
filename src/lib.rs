//! Downtime predictor
//!
//! A small HTTP service that trains a decision-tree classifier on uploaded
//! equipment readings and predicts whether a machine fails tomorrow.
//!
//! # Modules
//!
//! - [`data`] - CSV upload parsing and the binary-target dataset
//! - [`training`] - Seeded split, decision tree, metrics, training engine
//! - [`inference`] - Single-row prediction with confidence
//! - [`export`] - Binary model persistence
//! - [`server`] - axum HTTP API (upload, train, predict)
//! - [`cli`] - Command-line interface

pub mod error;

pub mod data;
pub mod training;
pub mod inference;
pub mod export;

pub mod server;
pub mod cli;

pub use error::{PredictorError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PredictorError, Result};
    pub use crate::data::{Dataset, FEATURE_COLUMNS, TARGET_COLUMN};
    pub use crate::training::{ClassificationMetrics, DecisionTree, TrainEngine, TrainedModel, TrainingConfig};
    pub use crate::inference::{predict_one, Prediction, PredictionInput};
    pub use crate::export::ModelStore;
    pub use crate::server::{create_router, run_server, AppState, ServerConfig};
}
