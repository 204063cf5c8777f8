//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use chirp_common::AppError;
use chirp_db::entities::user;
use tower_sessions::Session;

use crate::middleware::SESSION_CSRF_KEY;

/// Header carrying the CSRF token on mutating requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get user from request extensions (set by auth middleware)
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// CSRF guard for mutating routes.
///
/// Compares the `x-csrf-token` header against the token bound to the
/// session at signin. Signup and signin are the only mutating routes that
/// skip it, since they are the ones that mint the token.
#[derive(Debug, Clone, Copy)]
pub struct CsrfGuard;

impl<S> FromRequestParts<S> for CsrfGuard
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(format!("Session unavailable: {msg}")))?;

        let expected: Option<String> = session
            .get(SESSION_CSRF_KEY)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read session: {e}")))?;

        let presented = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok());

        match (expected.as_deref(), presented) {
            (Some(expected), Some(presented)) if expected == presented => Ok(Self),
            _ => Err(AppError::Unauthorized),
        }
    }
}
