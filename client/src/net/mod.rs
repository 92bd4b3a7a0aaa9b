//! Networking types for the auth boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! Request transport lives outside this crate; it reads the bearer header
//! from [`crate::state::auth::AuthStore::bearer_header`].

pub mod types;
