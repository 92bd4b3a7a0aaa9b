//! # client
//!
//! Client-side session store for the auth API. Holds the signed-in user and
//! bearer token, persists them across restarts through a pluggable storage
//! backend, and exposes them to Leptos components as a reactive signal.

pub mod net;
pub mod state;
pub mod util;
