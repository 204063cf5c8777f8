//! Messages endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::AppResult;
use chirp_core::CreateMessageInput;
use chirp_db::entities::message;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, CsrfGuard, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Message response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    pub created_at: String,
    pub user_id: i64,
    pub text: String,
}

impl From<message::Model> for MessageResponse {
    fn from(message: message::Model) -> Self {
        Self {
            id: message.id,
            created_at: message.created_at.to_rfc3339(),
            user_id: message.user_id,
            text: message.text,
        }
    }
}

/// Message response with like state.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDetailResponse {
    pub id: i64,
    pub created_at: String,
    pub user_id: i64,
    pub text: String,
    pub like_count: u64,
    /// Whether the requesting user has liked this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

/// Create message request.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(flatten)]
    pub input: CreateMessageInput,
}

/// Post a new message.
async fn create(
    AuthUser(user): AuthUser,
    _guard: CsrfGuard,
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let message = state.message_service.post(user.id, req.input).await?;

    Ok(ApiResponse::ok(message.into()))
}

/// Show message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowMessageRequest {
    pub message_id: i64,
}

/// Get a message by id, with its like count.
async fn show(
    MaybeAuthUser(principal): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowMessageRequest>,
) -> AppResult<ApiResponse<MessageDetailResponse>> {
    let message = state.message_service.get(req.message_id).await?;
    let like_count = state.message_service.like_count(message.id).await?;

    let is_liked = match principal {
        Some(principal) => Some(
            state
                .message_service
                .has_liked(principal.id, message.id)
                .await?,
        ),
        None => None,
    };

    Ok(ApiResponse::ok(MessageDetailResponse {
        id: message.id,
        created_at: message.created_at.to_rfc3339(),
        user_id: message.user_id,
        text: message.text,
        like_count,
        is_liked,
    }))
}

/// Delete message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub message_id: i64,
}

/// Delete one of the signed-in user's messages.
async fn delete(
    AuthUser(user): AuthUser,
    _guard: CsrfGuard,
    State(state): State<AppState>,
    Json(req): Json<DeleteMessageRequest>,
) -> AppResult<ApiResponse<()>> {
    state.message_service.delete(user.id, req.message_id).await?;

    Ok(ApiResponse::ok(()))
}

/// Like toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeMessageRequest {
    pub message_id: i64,
}

/// Resulting like state.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStateResponse {
    /// Whether the caller now likes the message.
    pub liked: bool,
}

/// Toggle a like on a message.
async fn like(
    AuthUser(user): AuthUser,
    _guard: CsrfGuard,
    State(state): State<AppState>,
    Json(req): Json<LikeMessageRequest>,
) -> AppResult<ApiResponse<LikeStateResponse>> {
    let liked = state
        .message_service
        .toggle_like(user.id, req.message_id)
        .await?;

    Ok(ApiResponse::ok(LikeStateResponse { liked }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/delete", post(delete))
        .route("/like", post(like))
}
