// Authentication and authorization error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::auth::models::Role;
use crate::error::ErrorResponse;

const INTERNAL_MESSAGE: &str = "Internal server error.";
// Shared by every rejected token so callers cannot tell why it failed
const TOKEN_REJECTED_MESSAGE: &str = "Invalid or expired token.";

/// Authentication and authorization error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Authentication errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailAlreadyExists,

    // Token errors
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    // Authorization errors
    /// Caller is authenticated but its role does not permit the operation
    #[error("Insufficient permissions: required role '{required}', but user has role '{actual}'")]
    InsufficientPermissions {
        required: Role,
        actual: Role,
        message: String,
    },

    // Internal errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

// Malformed bodies get the same 400 JSON shape as failed field validation
impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::ValidationError(rejection.body_text())
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken | AuthError::ExpiredToken => StatusCode::FORBIDDEN,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::InvalidRole(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the response body
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::ValidationError(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailAlreadyExists => "CONFLICT",
            AuthError::MissingToken => "UNAUTHORIZED",
            AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::InsufficientPermissions { .. } => "FORBIDDEN",
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::InvalidRole(_) => "INTERNAL_ERROR",
        }
    }

    /// Message that is safe to send to clients
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Invalid email or password.".to_string(),
            AuthError::EmailAlreadyExists => {
                "An account with this email already exists.".to_string()
            }
            AuthError::MissingToken => "Authentication required.".to_string(),
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                TOKEN_REJECTED_MESSAGE.to_string()
            }
            AuthError::InsufficientPermissions { message, .. } => message.clone(),
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::InvalidRole(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::InsufficientPermissions { required, actual, .. } => {
                warn!(
                    "Authorization failed: required role '{}', user has role '{}'",
                    required, actual
                );
            }
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::InvalidRole(_) => error!("Auth internal error: {}", self),
            _ => {}
        }

        let body = ErrorResponse::new(self.error_code(), self.error_message());
        (self.status_code(), Json(body)).into_response()
    }
}
