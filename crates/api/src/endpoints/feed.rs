//! Home feed endpoint.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::AppResult;
use chirp_core::MAX_HOME_FEED;
use serde::Deserialize;

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

use super::messages::MessageResponse;

/// Home feed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeedRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<i64>,
}

const fn default_limit() -> u64 {
    MAX_HOME_FEED
}

/// The signed-in user's home feed: own messages plus followed users'.
///
/// Anonymous callers get an empty feed, not an error.
async fn home(
    MaybeAuthUser(principal): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<HomeFeedRequest>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let Some(principal) = principal else {
        return Ok(ApiResponse::ok(Vec::new()));
    };

    let messages = state
        .feed_service
        .home_feed(principal.id, req.limit, req.until_id)
        .await?;

    Ok(ApiResponse::ok(
        messages.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/home", post(home))
}
