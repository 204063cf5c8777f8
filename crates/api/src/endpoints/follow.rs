//! Follow endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, CsrfGuard},
    middleware::AppState,
    response::ApiResponse,
};

/// Follow request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: i64,
}

/// Resulting edge state.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStateResponse {
    /// Whether the caller now follows the target.
    pub following: bool,
    /// Whether this request changed anything.
    pub changed: bool,
}

/// Follow a user.
async fn create(
    AuthUser(user): AuthUser,
    _guard: CsrfGuard,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    let changed = state.follow_service.follow(user.id, req.user_id).await?;

    Ok(ApiResponse::ok(FollowStateResponse {
        following: true,
        changed,
    }))
}

/// Unfollow a user.
async fn delete(
    AuthUser(user): AuthUser,
    _guard: CsrfGuard,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    let changed = state.follow_service.unfollow(user.id, req.user_id).await?;

    Ok(ApiResponse::ok(FollowStateResponse {
        following: false,
        changed,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/delete", post(delete))
}
