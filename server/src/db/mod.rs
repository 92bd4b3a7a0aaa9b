//! Database pool initialization.
//!
//! SYSTEM CONTEXT
//! ==============
//! The pool is the opaque data-access handle carried by every request
//! context. Its concurrency discipline is SQLx's; nothing in the auth layer
//! issues queries itself.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect the shared `PostgreSQL` pool.
///
/// # Errors
///
/// Returns an error if the initial connection fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
