//! Bearer credential extraction and verification.
//!
//! DESIGN
//! ======
//! Credentials are HS-family JWTs signed with a single process-wide secret.
//! Verification is a pure function of (credential, secret, now): signature and
//! structure checks are delegated to `jsonwebtoken`, while expiry is compared
//! against the caller-supplied clock so the outcome never depends on ambient
//! time.
//!
//! The three failure kinds stay distinct here so callers can log them, but the
//! request context collapses all of them to "anonymous".

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Scheme marker expected at the start of the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by an issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the credential was issued to.
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    /// Issued-at, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("credential is malformed")]
    Malformed,
    #[error("credential signature is invalid")]
    SignatureInvalid,
    #[error("credential has expired")]
    Expired,
}

impl VerificationError {
    /// Short label used as a structured log field.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::SignatureInvalid => "signature_invalid",
            Self::Expired => "expired",
        }
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> VerificationError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => VerificationError::SignatureInvalid,
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        _ => VerificationError::Malformed,
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    // Expiry is checked against the caller's clock below.
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);
    validation
}

/// Verify `credential` against `secret` as of `now`.
///
/// A credential is expired once `now` reaches its `exp` claim.
///
/// # Errors
///
/// Returns [`VerificationError::Malformed`] for empty or unparseable input
/// (including missing required claims), [`VerificationError::SignatureInvalid`]
/// when the signature does not match `secret`, and
/// [`VerificationError::Expired`] when the credential is past its expiry.
pub fn verify(credential: &str, secret: &str, now: OffsetDateTime) -> Result<Claims, VerificationError> {
    if credential.is_empty() {
        return Err(VerificationError::Malformed);
    }

    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = jsonwebtoken::decode::<Claims>(credential, &key, &validation()).map_err(|e| classify(&e))?;

    if now.unix_timestamp() >= data.claims.exp {
        return Err(VerificationError::Expired);
    }
    Ok(data.claims)
}

/// Extract the credential following the bearer scheme marker.
///
/// Returns `None` when the header is absent, not valid UTF-8, or uses another
/// scheme. An empty credential after the marker is returned as `Some("")`.
#[must_use]
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
}

/// Tagged result of resolving a request's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    /// No bearer credential was presented.
    Missing,
    Verified(Claims),
    Rejected(VerificationError),
}

/// Extract and verify the bearer credential carried by `headers`.
#[must_use]
pub fn resolve(headers: &HeaderMap, secret: &str, now: OffsetDateTime) -> CredentialOutcome {
    let Some(credential) = bearer_credential(headers) else {
        return CredentialOutcome::Missing;
    };
    match verify(credential, secret, now) {
        Ok(claims) => CredentialOutcome::Verified(claims),
        Err(e) => CredentialOutcome::Rejected(e),
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};

    /// Sign arbitrary claims with HS256.
    pub fn sign<T: Serialize>(claims: &T, secret: &str) -> String {
        sign_with(Algorithm::HS256, claims, secret)
    }

    pub fn sign_with<T: Serialize>(alg: Algorithm, claims: &T, secret: &str) -> String {
        jsonwebtoken::encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("signing should not fail")
    }

    /// Claims for `user_id` expiring `ttl_secs` after `now` (negative = already expired).
    pub fn claims_at(user_id: &str, now: OffsetDateTime, ttl_secs: i64) -> Claims {
        Claims {
            user_id: user_id.to_owned(),
            email: format!("{user_id}@example.com"),
            iat: Some(now.unix_timestamp()),
            exp: now.unix_timestamp() + ttl_secs,
        }
    }

    /// A credential for `user_id` valid for one hour from the real clock.
    pub fn fresh_token(user_id: &str, secret: &str) -> String {
        sign(&claims_at(user_id, OffsetDateTime::now_utc(), 3600), secret)
    }

    /// A credential for `user_id` that expired a minute ago.
    pub fn expired_token(user_id: &str, secret: &str) -> String {
        sign(&claims_at(user_id, OffsetDateTime::now_utc(), -60), secret)
    }
}

#[cfg(test)]
#[path = "credential_test.rs"]
mod tests;
