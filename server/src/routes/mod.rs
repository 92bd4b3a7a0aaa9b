//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The routes here are the thinnest possible dispatch layer over
//! `RequestContext`: a public health probe, a public identity report, and one
//! route that requires a verified caller. Procedure dispatch proper lives
//! elsewhere and consumes the same context.

pub mod auth;

use axum::Router;
use axum::middleware;
use axum::response::Json;
use axum::routing::get;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context;
use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/context", get(auth::context_status))
        .layer(middleware::from_fn(context::response_headers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

/// `GET /healthz`: liveness probe, no auth.
async fn healthz() -> Json<Health> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    Json(Health { status: "ok", timestamp })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
