//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use chirp_core::{AccountService, FeedService, FollowService, MessageService};
use tower_sessions::Session;

/// Session key holding the signed-in user's id.
pub const SESSION_USER_KEY: &str = "user_id";

/// Session key holding the token mutating requests must echo back.
pub const SESSION_CSRF_KEY: &str = "csrf_token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub follow_service: FollowService,
    pub message_service: MessageService,
    pub feed_service: FeedService,
}

/// Authentication middleware.
///
/// Resolves the session's principal and stashes the user model in request
/// extensions. Never rejects on its own: routes that need a principal
/// enforce that through the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    session: Session,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // A stale id (deleted account) degrades to anonymous
    if let Ok(Some(user_id)) = session.get::<i64>(SESSION_USER_KEY).await
        && let Ok(user) = state.account_service.get(user_id).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
