//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A field the active schema requires was absent from the request body.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The request body was present but malformed (wrong type, not an object).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable model artifact was loaded at startup and strict mode is active.
    #[error("Model not loaded")]
    ModelUnavailable,

    /// A validated record could not be turned into the feature vector the
    /// artifact expects. Indicates an artifact/schema inconsistency.
    #[error("Feature encoding failed: {0}")]
    EncodingError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MissingField(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::ModelUnavailable => {
                tracing::error!("Scoring requested but no model artifact is loaded");
                (StatusCode::INTERNAL_SERVER_ERROR, "Model not loaded".to_string())
            }
            AppError::EncodingError(msg) => {
                tracing::error!("Encoding error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal scoring error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_field() {
        let err = AppError::MissingField("payment_method".to_string());
        assert_eq!(err.to_string(), "Missing field: payment_method");
    }

    #[test]
    fn missing_field_maps_to_400() {
        let resp = AppError::MissingField("amount".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn model_unavailable_maps_to_500() {
        let resp = AppError::ModelUnavailable.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
