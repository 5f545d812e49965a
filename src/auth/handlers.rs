// HTTP handlers for authentication endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, SessionResponse},
    service::AuthService,
};

/// Register a new user
/// POST /api/register
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    tracing::debug!("Registration attempt");
    let Json(request) = payload?;

    service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful! Please log in.".to_string(),
        }),
    ))
}

/// Login a user
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(request) = payload?;
    let response = service.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

/// Identity behind the presented token (protected endpoint)
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me_handler(user: AuthenticatedUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: user.user_id,
        role: user.role,
    })
}
