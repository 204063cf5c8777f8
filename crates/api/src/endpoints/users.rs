//! Users endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::{AppError, AppResult};
use chirp_core::UpdateProfileInput;
use chirp_db::entities::user;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{
    extractors::{AuthUser, CsrfGuard, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

use super::messages::MessageResponse;

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub created_at: String,
    pub username: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: String,
    pub location: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at.to_rfc3339(),
            username: user.username,
            image_url: user.image_url,
            header_image_url: user.header_image_url,
            bio: user.bio,
            location: user.location,
        }
    }
}

/// User response with graph and message counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub id: i64,
    pub created_at: String,
    pub username: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: String,
    pub location: String,
    pub messages_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    /// Whether the requesting user follows this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

impl UserDetailResponse {
    fn new(
        user: user::Model,
        messages_count: u64,
        followers_count: u64,
        following_count: u64,
        is_following: Option<bool>,
    ) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at.to_rfc3339(),
            username: user.username,
            image_url: user.image_url,
            header_image_url: user.header_image_url,
            bio: user.bio,
            location: user.location,
            messages_count,
            followers_count,
            following_count,
            is_following,
        }
    }
}

/// List users request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    /// Username substring filter.
    pub query: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

const fn max_limit() -> u64 {
    100
}

/// List users with an optional username filter.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListUsersRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let limit = req.limit.min(max_limit());
    let users = state
        .account_service
        .list(req.query.as_deref(), limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Show user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUserRequest {
    pub user_id: i64,
}

/// Get a user by id, with follower/following/message counts.
async fn show(
    MaybeAuthUser(principal): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowUserRequest>,
) -> AppResult<ApiResponse<UserDetailResponse>> {
    let user = state.account_service.get(req.user_id).await?;

    let messages_count = state.message_service.message_count(user.id).await?;
    let followers_count = state.follow_service.count_followers(user.id).await?;
    let following_count = state.follow_service.count_following(user.id).await?;

    let is_following = match principal {
        Some(principal) if principal.id != user.id => Some(
            state
                .follow_service
                .is_following(principal.id, user.id)
                .await?,
        ),
        _ => None,
    };

    Ok(ApiResponse::ok(UserDetailResponse::new(
        user,
        messages_count,
        followers_count,
        following_count,
        is_following,
    )))
}

/// Follow listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEdgesRequest {
    pub user_id: i64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Users following the given user, newest edge first.
async fn followers(
    State(state): State<AppState>,
    Json(req): Json<UserEdgesRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    state.account_service.get(req.user_id).await?;

    let limit = req.limit.min(max_limit());
    let users = state.follow_service.followers(req.user_id, limit).await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Users the given user follows, newest edge first.
async fn following(
    State(state): State<AppState>,
    Json(req): Json<UserEdgesRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    state.account_service.get(req.user_id).await?;

    let limit = req.limit.min(max_limit());
    let users = state.follow_service.following(req.user_id, limit).await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// User likes request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLikesRequest {
    pub user_id: i64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Messages the given user has liked, newest like first.
async fn likes(
    State(state): State<AppState>,
    Json(req): Json<UserLikesRequest>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    state.account_service.get(req.user_id).await?;

    let limit = req.limit.min(max_limit());
    let messages = state.message_service.likes_of(req.user_id, limit).await?;

    Ok(ApiResponse::ok(
        messages.into_iter().map(Into::into).collect(),
    ))
}

/// User messages request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessagesRequest {
    pub user_id: i64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<i64>,
}

/// Messages the given user has posted, newest first.
async fn messages(
    State(state): State<AppState>,
    Json(req): Json<UserMessagesRequest>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    state.account_service.get(req.user_id).await?;

    let limit = req.limit.min(max_limit());
    let messages = state
        .message_service
        .messages_of(req.user_id, limit, req.until_id)
        .await?;

    Ok(ApiResponse::ok(
        messages.into_iter().map(Into::into).collect(),
    ))
}

/// Update profile request.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(flatten)]
    pub input: UpdateProfileInput,
}

/// Update the signed-in user's profile.
///
/// The current password rides in the body and is re-verified before any
/// field changes.
async fn update(
    AuthUser(user): AuthUser,
    _guard: CsrfGuard,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .account_service
        .update_profile(user.id, req.input)
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Delete the signed-in user's account and end the session.
async fn delete(
    AuthUser(user): AuthUser,
    _guard: CsrfGuard,
    State(state): State<AppState>,
    session: Session,
) -> AppResult<ApiResponse<()>> {
    state.account_service.delete_account(user.id).await?;

    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to clear session: {e}")))?;

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/show", post(show))
        .route("/followers", post(followers))
        .route("/following", post(following))
        .route("/likes", post(likes))
        .route("/messages", post(messages))
        .route("/update", post(update))
        .route("/delete", post(delete))
}
