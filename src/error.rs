// Error handling module for the Character Vault API
// Provides the shared error body, the CRUD error type and startup failures

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::auth::AuthError;
use crate::config::ConfigError;

/// Error type for the character endpoints.
/// All character handlers return Result<T, ApiError>.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Maps to HTTP 400 Bad Request
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Body is not JSON or does not match the payload type; maps to HTTP 400
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Maps to HTTP 404 Not Found
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    /// Maps to HTTP 500; details are logged, never returned
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Guard and role gate rejections keep their own status codes
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Consistent error response structure
///
/// Every error body carries a human-readable `message`; the browser scripts
/// display it as-is.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (e.g., field-level validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                let details = serde_json::to_value(&errors).unwrap_or(serde_json::json!({}));
                let body = ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(details);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::InvalidBody(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                let body = ErrorResponse::new("VALIDATION_ERROR", rejection.body_text());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                let body =
                    ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id));
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                let body = ErrorResponse::new("DATABASE_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::Auth(auth_error) => auth_error.into_response(),
        }
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(e) => e.status_code(),
        }
    }
}

/// Failures that stop the server from starting
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("admin seed failed: {0}")]
    Seed(#[from] AuthError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
