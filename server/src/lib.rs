//! # server
//!
//! Request authentication for the HTTP API. Each inbound request is given a
//! [`context::RequestContext`] carrying the caller's verified identity (or
//! none), the request head, a response-header handle, and the shared database
//! pool. Routes read identity from the context; only routes that need a caller
//! reject anonymous requests.

pub mod config;
pub mod context;
pub mod db;
pub mod routes;
pub mod services;
pub mod state;
