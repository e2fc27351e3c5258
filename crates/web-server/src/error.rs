use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use analytics::AnalyticsError;
use engine::EngineError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(id) => {
                AppError::NotFound(format!("Asset with ID {} was not found", id))
            }
            EngineError::Validation(e) => AppError::BadRequest(e.to_string()),
            EngineError::Analytics(e @ AnalyticsError::InvalidRange { .. }) => {
                AppError::BadRequest(format!("{}. The start date must not be after the end date.", e))
            }
            EngineError::Analytics(e) => AppError::BadRequest(e.to_string()),
            EngineError::Database(e) => AppError::Database(e),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
