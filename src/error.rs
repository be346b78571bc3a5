//! Error types for the downtime predictor

use thiserror::Error;

/// Result type alias for predictor operations
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Main error type for dataset handling, training and inference
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Only CSV files are allowed.")]
    InvalidFileType(String),

    #[error("Dataset must contain a '{0}' column.")]
    MissingTarget(String),

    #[error("'{column}' column must be binary (two unique values).")]
    NonBinaryTarget { column: String, distinct: usize },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("No model available at {0}")]
    ModelUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl PredictorError {
    /// Errors caused by what the caller sent rather than by processing it
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictorError::InvalidFileType(_)
                | PredictorError::MissingTarget(_)
                | PredictorError::NonBinaryTarget { .. }
                | PredictorError::ModelUnavailable(_)
        )
    }
}

impl From<polars::error::PolarsError> for PredictorError {
    fn from(err: polars::error::PolarsError) -> Self {
        PredictorError::DataError(err.to_string())
    }
}

impl From<bincode::Error> for PredictorError {
    fn from(err: bincode::Error) -> Self {
        PredictorError::SerializationError(err.to_string())
    }
}
