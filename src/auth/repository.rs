// Credential store for user accounts

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{Role, User},
};

/// Persistence seam for user accounts.
///
/// Email lookups are exact matches against the stored value.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, AuthError>;

    /// Insert a user with an explicit role.
    ///
    /// Fails with `EmailAlreadyExists` when the email is taken.
    async fn create_user_with_role(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError>;

    /// Insert a user with the default `member` role
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        self.create_user_with_role(name, email, password_hash, Role::Member)
            .await
    }
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn create_user_with_role(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    /// In-memory store used by service and HTTP tests
    #[derive(Default)]
    pub struct InMemoryUserStore {
        users: Mutex<Vec<User>>,
    }

    impl InMemoryUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count_with_email(&self, email: &str) -> usize {
            let users = self.users.lock().unwrap();
            users.iter().filter(|u| u.email == email).count()
        }

        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().any(|u| u.email == email))
        }

        async fn create_user_with_role(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
            role: Role,
        ) -> Result<User, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == email) {
                return Err(AuthError::EmailAlreadyExists);
            }

            let user = User {
                id: users.len() as i32 + 1,
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role: role.as_str().to_string(),
                created_at: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        }
    }
}
