//! Authentication request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    AuthResponse, LoginRequest, LogoutRequest, LogoutResponse, RefreshRequest, RegisterRequest,
    UserResponse,
};
use crate::services::auth;

/// `POST /auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = auth::register(
        &state.pool,
        &body.username,
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /auth/login` — authenticate with username-or-email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::login(
        &state.pool,
        &body.username_or_email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
        state.config.refresh_token_ttl_secs,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /auth/refresh` — exchange a refresh token for a new token pair.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::refresh(
        &state.pool,
        &body.refresh_token,
        state.config.jwt_secret.as_bytes(),
        state.config.refresh_token_ttl_secs,
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /auth/logout` — soft-revoke a refresh token. The body is
/// optional: a bare logout with no token to revoke still succeeds.
pub async fn logout_handler(
    State(state): State<AppState>,
    body: Option<Json<LogoutRequest>>,
) -> AppResult<Json<LogoutResponse>> {
    let token = body.and_then(|Json(b)| b.refresh_token);
    let resp = auth::logout(&state.pool, token.as_deref()).await?;
    Ok(Json(resp))
}

/// `GET /auth/me` — current authenticated user. Protected route.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<UserResponse>> {
    let resp = auth::current_user(&state.pool, &user.username).await?;
    Ok(Json(resp))
}
