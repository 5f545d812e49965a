// Authentication service - business logic layer

use std::sync::Arc;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{LoginResponse, RegisterRequest, Role, User},
    password::PasswordService,
    repository::UserStore,
    token::TokenService,
};
use crate::config::{AdminSeed, BootstrapAdmin};

/// Identity handed out to the bootstrap admin login
pub const BOOTSTRAP_ADMIN_ID: i32 = 0;
const BOOTSTRAP_ADMIN_NAME: &str = "Admin";

/// Authentication service coordinating registration and login
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    bootstrap_admin: Option<BootstrapAdmin>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        bootstrap_admin: Option<BootstrapAdmin>,
    ) -> Self {
        if bootstrap_admin.is_some() {
            warn!("Bootstrap admin login is enabled; disable it once a seeded admin account exists");
        }

        Self {
            users,
            tokens,
            bootstrap_admin,
        }
    }

    /// Register a new member account and return its id
    pub async fn register(&self, request: RegisterRequest) -> Result<i32, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;

        if self.users.email_exists(&request.email).await? {
            debug!("Registration rejected: email already registered");
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = PasswordService::hash_password_blocking(request.password).await?;
        let user = self
            .users
            .create_user(&request.name, &request.email, &password_hash)
            .await?;

        info!("Registered user with id: {}", user.id);
        Ok(user.id)
    }

    /// Log a user in and issue a session token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if let Some(admin) = &self.bootstrap_admin {
            let email_matches = constant_time_eq(admin.email.as_bytes(), email.as_bytes());
            let password_matches = constant_time_eq(admin.password.as_bytes(), password.as_bytes());
            if email_matches & password_matches {
                warn!("Bootstrap admin login used");
                let token = self.tokens.issue(BOOTSTRAP_ADMIN_ID, Role::Admin)?;
                return Ok(LoginResponse {
                    token,
                    role: Role::Admin,
                    name: BOOTSTRAP_ADMIN_NAME.to_string(),
                });
            }
        }

        let user: User = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                debug!("Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let matches = PasswordService::verify_password_blocking(
            password.to_string(),
            user.password_hash.clone(),
        )
        .await?;
        if !matches {
            debug!("Login failed for user id {}: password mismatch", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let role = user.role()?;
        let token = self.tokens.issue(user.id, role)?;

        info!("User {} logged in with role {}", user.id, role);
        Ok(LoginResponse {
            token,
            role,
            name: user.name,
        })
    }

    /// Create the configured admin account unless the email is already taken.
    ///
    /// Returns whether an account was created.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<bool, AuthError> {
        if self.bootstrap_shadows(seed) {
            warn!(
                "Admin seed email {} is also the bootstrap admin email; the bootstrap login takes precedence",
                seed.email
            );
        }

        if self.users.email_exists(&seed.email).await? {
            debug!("Admin seed skipped: account already exists");
            return Ok(false);
        }

        let password_hash = PasswordService::hash_password_blocking(seed.password.clone()).await?;
        match self
            .users
            .create_user_with_role(&seed.name, &seed.email, &password_hash, Role::Admin)
            .await
        {
            Ok(user) => {
                info!("Seeded admin account with id: {}", user.id);
                Ok(true)
            }
            // Another instance seeded it first
            Err(AuthError::EmailAlreadyExists) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether the bootstrap login intercepts the seeded account's email
    pub fn bootstrap_shadows(&self, seed: &AdminSeed) -> bool {
        self.bootstrap_admin
            .as_ref()
            .is_some_and(|admin| admin.email == seed.email)
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
