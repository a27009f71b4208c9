//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Enforce role allow-lists
//! - Short-circuit requests (reject unauthorized)

/// Bearer token authentication and role guards
pub mod auth;
