use crate::response::ApiResponse;
use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::ValidationError;
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Bad input, rejected before the store is touched.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The request body exceeded the configured body limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Not found: {0}")]
    NotFound(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        body_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        body_rejection(rejection.status(), rejection.body_text())
    }
}

/// A body that could not be buffered because of the length limit keeps its
/// 413; every other decode failure is a plain bad request.
fn body_rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::Validation(message)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected path parameter.");
        AppError::Validation("Invalid id".to_string())
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Store failures are logged in full here and answered with a fixed message,
/// so driver and SQL details never reach the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::PayloadTooLarge(message) => (StatusCode::PAYLOAD_TOO_LARGE, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            AppError::Database(DbError::ForeignKeyViolation(detail)) => {
                tracing::warn!(error = %detail, "Rejected write with a dangling reference.");
                (
                    StatusCode::BAD_REQUEST,
                    "user_id does not reference an existing user".to_string(),
                )
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::error(error_message))).into_response()
    }
}
