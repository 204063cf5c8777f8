//! API endpoints.

mod auth;
mod feed;
mod follow;
mod messages;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/follow", follow::router())
        .nest("/messages", messages::router())
        .nest("/feed", feed::router())
}
