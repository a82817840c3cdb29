use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::{DatabaseError, TimeSlot};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{message}")]
    SlotConflict {
        message: String,
        conflicting_slot: Box<TimeSlot>,
    },

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "success": false,
                    "message": "Validation error",
                    "errors": errors,
                })),
            )
                .into_response(),
            AppError::SlotConflict {
                message,
                conflicting_slot,
            } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": message,
                    "conflicting_slot": conflicting_slot,
                })),
            )
                .into_response(),
            AppError::PreconditionFailed(message) => {
                failure(StatusCode::BAD_REQUEST, &message)
            }
            AppError::NotFound(message) => failure(StatusCode::NOT_FOUND, &message),
            AppError::Unauthorized(message) => failure(StatusCode::UNAUTHORIZED, &message),
            AppError::Forbidden(message) => failure(StatusCode::FORBIDDEN, &message),
            AppError::Transaction(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
            AppError::Database(err) => match err {
                DatabaseError::NotFound => {
                    failure(StatusCode::NOT_FOUND, "Resource not found")
                }
                DatabaseError::Duplicate => {
                    failure(StatusCode::CONFLICT, "Resource already exists")
                }
                err => {
                    tracing::error!("Database error: {}", err);
                    failure(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal server error occurred",
                    )
                }
            },
            AppError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                )
            }
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "message": message,
        })),
    )
        .into_response()
}

/// Single-field 422 built outside the derive-based validators, for
/// checks that only make sense after other lookups (unique mobile,
/// malformed query parameters).
pub fn field_error(field: &'static str, code: &'static str, message: &str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.to_string().into());
    errors.add(field, error);
    AppError::Validation(errors)
}

pub type AppResult<T> = Result<T, AppError>;
