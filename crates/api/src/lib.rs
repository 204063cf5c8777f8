//! HTTP API layer for chirp.
//!
//! This crate provides the JSON API surface:
//!
//! - **Endpoints**: POST-body routes for accounts, follows, messages, feed
//! - **Extractors**: session principal and CSRF guard
//! - **Middleware**: session-to-principal resolution
//!
//! Built on Axum 0.8 with tower-sessions for session state.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
