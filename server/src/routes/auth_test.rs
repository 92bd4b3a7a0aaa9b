use super::*;
use crate::routes::app;
use crate::services::credential::test_helpers::{expired_token, fresh_token};
use crate::state::test_helpers::{TEST_SECRET, test_app_state};
use axum::body::{Body, to_bytes};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use tower::ServiceExt;

async fn send(path: &str, authorization: Option<String>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let mut builder = axum::http::Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let response = app(test_app_state())
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

fn bearer(token: &str) -> Option<String> {
    Some(format!("Bearer {token}"))
}

// =============================================================================
// AuthRejection
// =============================================================================

#[test]
fn rejection_from_verification_error() {
    assert_eq!(AuthRejection::from(VerificationError::Expired), AuthRejection::TokenExpired);
    assert_eq!(AuthRejection::from(VerificationError::Malformed), AuthRejection::InvalidToken);
    assert_eq!(AuthRejection::from(VerificationError::SignatureInvalid), AuthRejection::InvalidToken);
}

#[test]
fn rejection_is_unauthorized() {
    let response = AuthRejection::MissingToken.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// GET /api/auth/me
// =============================================================================

#[tokio::test]
async fn me_without_token_is_401() {
    let (status, _, body) = send("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn me_with_expired_token_is_401_expired() {
    let (status, _, body) = send("/api/auth/me", bearer(&expired_token("u1", TEST_SECRET))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");
}

#[tokio::test]
async fn me_with_foreign_secret_is_401_invalid() {
    let (status, _, body) = send("/api/auth/me", bearer(&fresh_token("u1", "not-the-secret"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn me_with_basic_scheme_is_401_missing() {
    let (status, _, body) = send("/api/auth/me", Some("Basic dXNlcjpwYXNz".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn me_with_valid_token_returns_user_id() {
    let (status, headers, body) = send("/api/auth/me", bearer(&fresh_token("u1", TEST_SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], "u1");
    assert_eq!(headers.get(CACHE_CONTROL).unwrap().to_str().unwrap(), "no-store");
}

// =============================================================================
// GET /api/auth/context
// =============================================================================

#[tokio::test]
async fn context_without_token_is_anonymous() {
    let (status, _, body) = send("/api/auth/context", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert!(body["userId"].is_null());
    assert_eq!(body["path"], "/api/auth/context");
}

#[tokio::test]
async fn context_with_expired_token_is_anonymous_not_error() {
    let (status, _, body) = send("/api/auth/context", bearer(&expired_token("u1", TEST_SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert!(body["userId"].is_null());
}

#[tokio::test]
async fn context_with_garbage_token_is_anonymous_not_error() {
    let (status, _, body) = send("/api/auth/context", bearer("garbage")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn context_with_valid_token_is_authenticated() {
    let (status, _, body) = send("/api/auth/context", bearer(&fresh_token("u42", TEST_SECRET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["userId"], "u42");
}
