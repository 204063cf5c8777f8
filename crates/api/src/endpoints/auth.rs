//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use chirp_common::{AppError, AppResult, generate_csrf_token};
use chirp_core::CreateAccountInput;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    extractors::{AuthUser, CsrfGuard},
    middleware::{AppState, SESSION_CSRF_KEY, SESSION_USER_KEY},
    response::ApiResponse,
};

use super::users::UserResponse;

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(length(min = 6, max = 50), email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(max = 255))]
    pub image_url: Option<String>,
}

/// Authenticated session response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Echo this back in the `x-csrf-token` header on mutating requests.
    pub csrf_token: String,
}

/// Create a new account and sign it in.
async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    req.validate()?;

    let input = CreateAccountInput {
        username: req.username,
        email: req.email,
        password: req.password,
        image_url: req.image_url,
    };

    let user = state.account_service.signup(input).await?;
    let csrf_token = bind_session(&session, user.id).await?;

    Ok(ApiResponse::ok(AuthResponse {
        user: user.into(),
        csrf_token,
    }))
}

/// Signin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SigninRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let Some(user) = state
        .account_service
        .authenticate(&req.username, &req.password)
        .await?
    else {
        tracing::debug!(username = %req.username, "Rejected signin");
        return Err(AppError::Unauthorized);
    };

    let csrf_token = bind_session(&session, user.id).await?;

    Ok(ApiResponse::ok(AuthResponse {
        user: user.into(),
        csrf_token,
    }))
}

/// Signout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignoutResponse {
    pub ok: bool,
}

/// Sign out the current session.
///
/// The flush is a no-op when nothing is bound, so repeating it is
/// harmless.
async fn signout(
    AuthUser(_user): AuthUser,
    _guard: CsrfGuard,
    session: Session,
) -> AppResult<ApiResponse<SignoutResponse>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to clear session: {e}")))?;

    Ok(ApiResponse::ok(SignoutResponse { ok: true }))
}

/// Bind a freshly authenticated principal to the session and mint the
/// CSRF token mutating requests must present.
async fn bind_session(session: &Session, user_id: i64) -> AppResult<String> {
    let csrf_token = generate_csrf_token();

    session
        .insert(SESSION_USER_KEY, user_id)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind session: {e}")))?;
    session
        .insert(SESSION_CSRF_KEY, &csrf_token)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind session: {e}")))?;

    Ok(csrf_token)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}
