//! Request gate — bearer token extraction and identity establishment.
//!
//! `identify` runs on every request and never rejects: an absent,
//! malformed or unverifiable token simply leaves the request
//! unauthenticated, and downstream authorization (`require_auth`)
//! decides. No mutation, no token refresh side effect.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use storefront_core::auth::{jwt, queries};
use storefront_core::models::auth::Role;

use crate::AppState;
use crate::error::AppError;

/// Identity established for the remainder of request handling, stored in
/// request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub role: Role,
}

/// Pass-through identity gate. Attaches `AuthenticatedUser` when a valid
/// bearer token resolves to an enabled user; always forwards the request.
pub async fn identify(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(identity) = resolve_identity(&state, request.headers()).await {
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}

/// Rejecting check for protected routes: 401 when `identify` established
/// no identity.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<AuthenticatedUser>().is_none() {
        return Err(AppError::Unauthorized("Unauthorized".into()));
    }
    Ok(next.run(request).await)
}

fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<AuthenticatedUser> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = bearer_token(header)?;

    // Structural read first; trust comes from the full verify below,
    // performed against the live user record.
    let subject = jwt::extract_subject(token)?;
    let user = match queries::find_by_username(&state.pool, &subject).await {
        Ok(found) => found?,
        Err(e) => {
            tracing::warn!(error = %e, "user lookup failed during identification");
            return None;
        }
    };
    if !user.enabled {
        return None;
    }
    if let Err(e) = jwt::verify(token, state.config.jwt_secret.as_bytes()) {
        tracing::debug!(reason = %e, "bearer token rejected");
        return None;
    }

    Some(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_required_verbatim() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
