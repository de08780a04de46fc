use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Entity or its form table is absent
    #[error("{0}")]
    NotFound(String),

    /// Malformed field set, unsafe identifier or submission not matching the form
    #[error("{0}")]
    Schema(String),

    /// Failure that is not the client's fault and has no storage cause
    #[error("Internal error: {0}")]
    Internal(String),

    /// The insert guard rejected a submission
    #[error("Submission limit reached. Maximum {max} submissions allowed.")]
    CapacityExceeded { max: u32 },
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Storage(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Schema(msg) => {
                tracing::warn!("Rejected form input: {}", msg);
                StatusCode::BAD_REQUEST
            }
            AppError::CapacityExceeded { max } => {
                tracing::warn!("Submission rejected, form is full ({} rows)", max);
                StatusCode::BAD_REQUEST
            }
        };

        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
