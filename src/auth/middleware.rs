// Route guard and role gate for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Identity of the caller, decoded from a verified token.
///
/// Lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Role gate for a specific operation.
    ///
    /// `denial` is the message shown to the caller when the role is not enough.
    pub fn require_role(&self, required: Role, denial: &str) -> Result<(), AuthError> {
        if self.role.satisfies(required) {
            debug!(
                "Authorization successful: user_id={}, role={}, required_role={}",
                self.user_id, self.role, required
            );
            return Ok(());
        }

        warn!(
            "Authorization failed: user_id={}, required_role={}, actual_role={}",
            self.user_id, required, self.role
        );
        Err(AuthError::InsufficientPermissions {
            required,
            actual: self.role,
            message: denial.to_string(),
        })
    }
}

/// Pull the credential out of `Authorization: Bearer <token>`.
///
/// Scheme and credential are separated by exactly one space.
/// No header, or a bare scheme, counts as missing. An empty credential
/// (`Bearer ` or `Bearer  <token>`), extra segments or any scheme other
/// than Bearer are invalid.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let mut parts = value.split(' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().ok_or(AuthError::MissingToken)?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || parts.next().is_some() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let endpoint = parts.uri.path().to_string();

        let token = bearer_token(&parts.headers).map_err(|e| {
            warn!("Rejected credential for protected endpoint {}: {}", endpoint, e);
            e
        })?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify(token).map_err(|e| {
            warn!("Token verification failed for endpoint {}: {}", endpoint, e);
            e
        })?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
