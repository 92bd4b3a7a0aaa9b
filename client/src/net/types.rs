//! Wire DTOs shared with the auth endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the server's camelCase JSON. Optional profile fields are
//! omitted when absent so persisted records stay byte-stable across
//! save/load cycles.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Client-side snapshot of the signed-in user. May lag behind the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// A user known only by id, before the profile has been fetched.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into(), email: None, username: None, avatar_url: None }
    }
}

/// Body returned by a successful login or registration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
