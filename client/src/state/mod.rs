//! Client-side state.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`auth::AuthStore`] owns the session and its persistence; [`context`]
//! exposes it to components as a reactive signal.

pub mod auth;
pub mod context;
