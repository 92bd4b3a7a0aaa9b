//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and extractors via `FromRef`.
//! It holds only what every request context needs: the database pool and the
//! read-only auth configuration. Neither is mutated after startup.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AuthConfig;

/// Clone is required by Axum; the pool is internally reference-counted and the
/// auth config is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, auth: AuthConfig) -> Self {
        Self { pool, auth: Arc::new(auth) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
