use axum::{http::StatusCode, response::Json};
use pizzeria_service::StoreError;
use serde_json::json;

pub const VALIDATION_ERRORS: &str = "validation errors";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("validation errors")]
    Validation,
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => ApiError::NotFound(format!("{entity} not found")),
            StoreError::InvalidPrice(_) | StoreError::MissingReference { .. } => {
                ApiError::Validation
            }
            e => ApiError::InternalError(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Validation => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [VALIDATION_ERRORS] })),
            )
                .into_response(),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}
