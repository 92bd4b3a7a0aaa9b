//! Auth routes and the identity-requiring extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::CACHE_CONTROL;
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use time::OffsetDateTime;

use crate::context::{RequestContext, RequestMeta, ResponseHandle};
use crate::services::credential::{self, CredentialOutcome, VerificationError};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Request context for a verified caller.
/// Use as a handler parameter to require authentication.
pub struct RequireUser {
    pub user_id: String,
    pub context: RequestContext,
}

/// Why a request was refused by [`RequireUser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
    TokenExpired,
}

impl AuthRejection {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "No token provided",
            Self::InvalidToken => "Invalid token",
            Self::TokenExpired => "Token expired",
        }
    }
}

impl From<VerificationError> for AuthRejection {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Expired => Self::TokenExpired,
            VerificationError::Malformed | VerificationError::SignatureInvalid => Self::InvalidToken,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(ErrorBody { error: self.message() })).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let outcome = credential::resolve(&parts.headers, app_state.auth.secret(), OffsetDateTime::now_utc());
        let user_id = match &outcome {
            CredentialOutcome::Verified(claims) => claims.user_id.clone(),
            CredentialOutcome::Missing => return Err(AuthRejection::MissingToken),
            CredentialOutcome::Rejected(err) => {
                tracing::debug!(reason = err.kind(), "rejecting request that requires a user");
                return Err((*err).into());
            }
        };

        let response = parts.extensions.get::<ResponseHandle>().cloned().unwrap_or_default();
        let context = RequestContext::from_outcome(RequestMeta::from_parts(parts), response, app_state.pool, outcome);
        Ok(Self { user_id, context })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub user_id: String,
}

/// `GET /api/auth/me`: return the verified caller.
pub async fn me(auth: RequireUser) -> Json<Me> {
    auth.context
        .response()
        .insert_header(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Json(Me { user_id: auth.user_id })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextStatus {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub path: String,
}

/// `GET /api/auth/context`: report how this request's identity resolved.
/// Invalid credentials show up as anonymous rather than as an error.
pub async fn context_status(ctx: RequestContext) -> Json<ContextStatus> {
    Json(ContextStatus {
        authenticated: ctx.is_authenticated(),
        user_id: ctx.user_id().map(str::to_owned),
        path: ctx.request().uri.path().to_owned(),
    })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
