use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::errors::{RenderError, StorageError};

/// Failure of one request. Client mistakes answer 400, everything else 500.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// Form input that does not coerce to the column type
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Storage(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Storage(err) => err.error_code(),
            AppError::Render(_) => "RENDER_FAILED",
            AppError::Validation { .. } => "VALIDATION_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let field = match &self {
            AppError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };
        let error_response = serde_json::json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "field": field,
        });

        (status, Json(error_response)).into_response()
    }
}
