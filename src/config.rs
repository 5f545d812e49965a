//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and handed to the components that need
//! it (pool, token service, auth service).

use std::env;
use std::fmt;
use std::str::FromStr;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the static pages and scripts
    pub static_dir: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Reserved login that bypasses the user table; `None` when disabled
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// Privileged account created at startup if absent
    pub admin_seed: Option<AdminSeed>,
}

// Keeps the signing secret out of debug logs
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bootstrap_admin", &self.bootstrap_admin)
            .field("admin_seed", &self.admin_seed)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub const DEFAULT_BOOTSTRAP_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
        };

        let server = ServerConfig {
            host: or_default("HOST", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 3000)?,
            static_dir: or_default("STATIC_DIR", "static"),
        };

        let bootstrap_admin = if parse_bool_or(&lookup, "BOOTSTRAP_ADMIN_ENABLED", true)? {
            Some(BootstrapAdmin {
                email: or_default("BOOTSTRAP_ADMIN_EMAIL", DEFAULT_BOOTSTRAP_ADMIN_EMAIL),
                password: or_default("BOOTSTRAP_ADMIN_PASSWORD", DEFAULT_BOOTSTRAP_ADMIN_PASSWORD),
            })
        } else {
            None
        };

        let admin_seed = match (lookup("ADMIN_SEED_EMAIL"), lookup("ADMIN_SEED_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    name: or_default("ADMIN_SEED_NAME", "Admin"),
                    email,
                    password,
                })
            }
            _ => None,
        };

        let auth = AuthConfig {
            jwt_secret: required("JWT_SECRET")?,
            bootstrap_admin,
            admin_seed,
        };

        Ok(Self { database, server, auth })
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
