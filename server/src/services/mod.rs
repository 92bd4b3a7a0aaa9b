//! Domain services used by the request context and HTTP routes.

pub mod credential;
