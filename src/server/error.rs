//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::PredictorError;

#[derive(Error, Debug)]
pub enum ServerError {
    /// A violated precondition or a rejected upload (400)
    #[error("{0}")]
    BadRequest(String),

    /// Anything that went wrong while processing an accepted request (500)
    #[error("{0}")]
    Internal(String),

    /// Body the extractors could not decode; keeps the extractor's status
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },
}

impl ServerError {
    /// Map a library error, prefixing server-side failures with `context`.
    /// Client-side failures keep their own message.
    pub fn from_predictor(err: PredictorError, context: &str) -> Self {
        if err.is_client_error() {
            ServerError::BadRequest(err.to_string())
        } else {
            ServerError::Internal(format!("{}: {}", context, err))
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::InvalidBody { status, .. } => *status,
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ServerError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ServerError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ServerError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ServerError::InvalidBody {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ServerError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        ServerError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ServerError::Internal(detail) => tracing::error!(detail = %detail, "Internal server error"),
            other => tracing::warn!(status = status.as_u16(), detail = %other, "Request rejected"),
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
