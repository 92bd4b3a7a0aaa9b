//! Startup configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` reads both structs once before binding the listener. Nothing here is
//! re-read per request; the signing secret is fixed for the process lifetime.

use std::fmt;

/// Signing secret used when `JWT_SECRET` is unset. Only acceptable for local
/// development; startup warns whenever it is in effect.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    MissingVar { var: &'static str },
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("JWT_SECRET must be set when JWT_SECRET_REQUIRED is enabled")]
    MissingSecret,
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key, value: raw }),
        Err(_) => Ok(default),
    }
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Load from `DATABASE_URL` (required), `PORT` (default 3000) and
    /// `DB_MAX_CONNECTIONS` (default 5).
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric variable does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar { var: "DATABASE_URL" })?;
        Ok(Self {
            database_url,
            port: env_parse("PORT", DEFAULT_PORT)?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
        })
    }
}

// =============================================================================
// AUTH CONFIG
// =============================================================================

/// Credential verification settings.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    weak: bool,
}

impl AuthConfig {
    /// Use an explicit secret. Flagged weak if it equals the development default.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        let weak = secret == DEFAULT_JWT_SECRET;
        Self { secret, weak }
    }

    /// Load from `JWT_SECRET`, honoring `JWT_SECRET_REQUIRED`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] only when `JWT_SECRET_REQUIRED` is
    /// enabled and no secret is set. Otherwise a missing secret falls back to
    /// [`DEFAULT_JWT_SECRET`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(std::env::var("JWT_SECRET").ok(), env_bool("JWT_SECRET_REQUIRED").unwrap_or(false))
    }

    /// An empty value counts as unset.
    pub(crate) fn resolve(raw: Option<String>, required: bool) -> Result<Self, ConfigError> {
        match raw.filter(|s| !s.is_empty()) {
            Some(secret) => Ok(Self::new(secret)),
            None if required => Err(ConfigError::MissingSecret),
            None => Ok(Self::new(DEFAULT_JWT_SECRET)),
        }
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// True when the insecure development secret is in effect.
    #[must_use]
    pub fn is_weak(&self) -> bool {
        self.weak
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("weak", &self.weak)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
