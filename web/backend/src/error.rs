use crate::models::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Handler failure. Details are logged; clients only see a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("failed to read collection: {0}")]
    Collection(recordshelf_core::Error),

    #[error(transparent)]
    Internal(#[from] recordshelf_core::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            AppError::Collection(e) => {
                tracing::error!("Failed to read collection: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read collection".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
