//! OAuth2 bridge handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{AuthResponse, OAuthProvidersResponse};
use crate::services::oauth;

/// `GET /auth/oauth2/providers` — the configured provider listing.
pub async fn providers_handler() -> Json<OAuthProvidersResponse> {
    Json(oauth::providers())
}

/// `POST /auth/oauth2/{provider}` — complete an OAuth2 login with the
/// provider's userinfo claim document.
pub async fn callback_handler(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(claims): Json<serde_json::Value>,
) -> AppResult<Json<AuthResponse>> {
    let resp = oauth::login(
        &state.pool,
        &provider,
        &claims,
        state.config.jwt_secret.as_bytes(),
        state.config.refresh_token_ttl_secs,
    )
    .await?;
    Ok(Json(resp))
}
