//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::Dataset;
use crate::error::PredictorError;
use crate::inference::{predict_one, PredictionInput};
use crate::training::{round2, TrainEngine};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Multipart field carrying the CSV upload
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResponse {
    pub message: String,
    pub accuracy: f64,
    pub f1_score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "Downtime")]
    pub downtime: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello, World!".to_string(),
    })
}

// ============================================================================
// Data Handlers
// ============================================================================

/// Upload a CSV file and make it the current dataset
pub async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        info!(file = %file_name, bytes = data.len(), "Received upload");

        let dataset = Dataset::from_csv_upload(&file_name, &data)
            .map_err(|e| ServerError::from_predictor(e, "Error processing file"))?;
        let columns = dataset.column_names();
        state.store_dataset(dataset).await;

        return Ok(Json(UploadResponse {
            message: "Dataset uploaded successfully!".to_string(),
            columns,
        }));
    }

    Err(ServerError::InvalidBody {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: format!("Field required: {}", FILE_FIELD),
    })
}

// ============================================================================
// Training Handlers
// ============================================================================

/// Fit a model on the current dataset, persist it and keep it in memory
pub async fn train_model(State(state): State<Arc<AppState>>) -> Result<Json<TrainResponse>> {
    let dataset = state.current_dataset().await.ok_or_else(|| {
        ServerError::BadRequest("No dataset uploaded. Please upload a dataset first.".to_string())
    })?;

    let engine = TrainEngine::new(state.training.clone());
    let store = state.store.clone();
    info!(rows = dataset.height(), "Training started");

    let model = tokio::task::spawn_blocking(move || {
        let model = engine.fit(&dataset)?;
        store.save(&model)?;
        Ok::<_, PredictorError>(model)
    })
    .await
    .map_err(|e| ServerError::Internal(format!("Error training model: {}", e)))?
    .map_err(|e| ServerError::Internal(format!("Error training model: {}", e)))?;

    let accuracy = round2(model.metrics.accuracy);
    let f1_score = round2(model.metrics.f1_score);
    state.set_model(model).await;

    Ok(Json(TrainResponse {
        message: "Model trained successfully!".to_string(),
        accuracy,
        f1_score,
    }))
}

// ============================================================================
// Inference Handlers
// ============================================================================

/// Predict downtime from the four sensor readings
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(input) = payload?;

    let model = state.resolve_model().await.map_err(|e| match e {
        PredictorError::ModelUnavailable(_) => {
            ServerError::BadRequest("No model available. Train a model first.".to_string())
        }
        other => ServerError::Internal(format!("Error loading model: {}", other)),
    })?;

    let prediction = predict_one(&model, &input)
        .map_err(|e| ServerError::Internal(format!("Error during prediction: {}", e)))?;

    Ok(Json(PredictResponse {
        downtime: prediction.downtime().to_string(),
        confidence: round2(prediction.confidence),
    }))
}
