//! Per-request authentication context.
//!
//! ARCHITECTURE
//! ============
//! Every inbound request gets exactly one `RequestContext`, built from the
//! request head, a response handle, and the shared database pool. Handlers
//! receive it as an extractor and read `user_id()` to learn who is calling.
//! The context is immutable once built; the response handle is the only
//! channel back out, and it stages headers rather than writing the response.
//!
//! ERROR HANDLING
//! ==============
//! Building a context never fails. A missing, malformed, badly signed, or
//! expired credential resolves to an anonymous context. The failure kind is
//! logged and goes no further: rejecting anonymous callers belongs to the
//! routes that need an identity.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{FromRef, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::services::credential::{self, CredentialOutcome, VerificationError};
use crate::state::AppState;

// =============================================================================
// REQUEST / RESPONSE HANDLES
// =============================================================================

/// Read-only copy of the inbound request head.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestMeta {
    #[must_use]
    pub fn from_parts(parts: &Parts) -> Self {
        Self { method: parts.method.clone(), uri: parts.uri.clone(), headers: parts.headers.clone() }
    }
}

/// Headers staged for the outgoing response.
///
/// Cloning shares the underlying map. The [`response_headers`] middleware
/// merges whatever is staged once the handler returns.
#[derive(Debug, Clone, Default)]
pub struct ResponseHandle {
    headers: Arc<Mutex<HeaderMap>>,
}

impl ResponseHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a header, replacing any value previously staged under `name`.
    pub fn insert_header(&self, name: HeaderName, value: HeaderValue) {
        self.lock().insert(name, value);
    }

    /// Stage an additional value for `name`.
    pub fn append_header(&self, name: HeaderName, value: HeaderValue) {
        self.lock().append(name, value);
    }

    /// Snapshot of the currently staged headers.
    #[must_use]
    pub fn staged(&self) -> HeaderMap {
        self.lock().clone()
    }

    fn take(&self) -> HeaderMap {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HeaderMap> {
        self.headers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Middleware: give each request a [`ResponseHandle`] and apply its staged
/// headers to the response. Staged values replace handler-set headers of the
/// same name.
pub async fn response_headers(mut req: Request, next: Next) -> Response {
    let handle = ResponseHandle::new();
    req.extensions_mut().insert(handle.clone());

    let mut response = next.run(req).await;
    response.headers_mut().extend(handle.take());
    response
}

// =============================================================================
// REQUEST CONTEXT
// =============================================================================

#[derive(Debug)]
pub struct RequestContext {
    request: RequestMeta,
    response: ResponseHandle,
    db: PgPool,
    user_id: Option<String>,
}

impl RequestContext {
    /// Resolve the caller's identity from the request's bearer credential and
    /// assemble the context. Never fails.
    #[must_use]
    pub fn build(request: RequestMeta, response: ResponseHandle, db: PgPool, secret: &str) -> Self {
        Self::build_at(request, response, db, secret, OffsetDateTime::now_utc())
    }

    /// [`RequestContext::build`] with an explicit clock.
    #[must_use]
    pub fn build_at(request: RequestMeta, response: ResponseHandle, db: PgPool, secret: &str, now: OffsetDateTime) -> Self {
        let outcome = credential::resolve(&request.headers, secret, now);
        Self::from_outcome(request, response, db, outcome)
    }

    /// Bind identity from an already-resolved credential outcome.
    pub(crate) fn from_outcome(
        request: RequestMeta,
        response: ResponseHandle,
        db: PgPool,
        outcome: CredentialOutcome,
    ) -> Self {
        let user_id = match outcome {
            CredentialOutcome::Missing => None,
            CredentialOutcome::Verified(claims) => Some(claims.user_id),
            CredentialOutcome::Rejected(err) => {
                log_rejection(&request, err);
                None
            }
        };
        Self { request, response, db, user_id }
    }

    #[must_use]
    pub fn request(&self) -> &RequestMeta {
        &self.request
    }

    #[must_use]
    pub fn response(&self) -> &ResponseHandle {
        &self.response
    }

    #[must_use]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Verified subject, or `None` for anonymous requests.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

fn log_rejection(request: &RequestMeta, err: VerificationError) {
    let path = request.uri.path();
    if err == VerificationError::Expired {
        tracing::debug!(reason = err.kind(), %path, "credential rejected; treating request as anonymous");
    } else {
        tracing::warn!(reason = err.kind(), %path, "credential rejected; treating request as anonymous");
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        // Detached handle when the middleware is not installed; staged headers are dropped.
        let response = parts.extensions.get::<ResponseHandle>().cloned().unwrap_or_default();
        Ok(Self::build(RequestMeta::from_parts(parts), response, app_state.pool, app_state.auth.secret()))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
