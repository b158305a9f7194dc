//! Authentication service — login/register/refresh flows delegating to
//! `storefront_core::auth`.

use sqlx::PgPool;
use tracing::info;

use storefront_core::auth::jwt::{self, IssuedAccessToken};
use storefront_core::auth::password::{hash_password, verify_password};
use storefront_core::auth::{AuthError, queries, refresh as ledger};
use storefront_core::models::auth::{Role, User};

use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LogoutResponse, UserResponse};

/// Build an `AuthResponse` from user data plus a fresh token pair.
fn build_auth_response(
    user: &User,
    access: IssuedAccessToken,
    refresh_token: Option<String>,
) -> AuthResponse {
    AuthResponse {
        access_token: access.token,
        refresh_token,
        token_type: "Bearer".to_string(),
        user_id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        expires_at: access.expires_at,
    }
}

/// Issue a full session (access token + rotated refresh token) for an
/// already-authenticated user. Shared by password login, refresh and the
/// OAuth2 bridge so every session has the same shape.
pub(crate) async fn issue_session(
    pool: &PgPool,
    user: &User,
    jwt_secret: &[u8],
    refresh_ttl_secs: i64,
) -> AppResult<AuthResponse> {
    let access = jwt::issue(&user.username, user.role, jwt_secret)?;
    let refresh = ledger::issue(pool, user.id, refresh_ttl_secs).await?;
    Ok(build_auth_response(user, access, Some(refresh.token)))
}

/// Authenticate with username-or-email + password.
///
/// Every failure mode (unknown identifier, disabled account,
/// provider-managed account, wrong password) reads as the same
/// `InvalidCredentials`.
pub async fn login(
    pool: &PgPool,
    identifier: &str,
    password: &str,
    jwt_secret: &[u8],
    refresh_ttl_secs: i64,
) -> AppResult<AuthResponse> {
    let user = queries::find_by_username_or_email(pool, identifier)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !user.enabled || !user.has_local_password() {
        return Err(AuthError::InvalidCredentials.into());
    }
    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    issue_session(pool, &user, jwt_secret, refresh_ttl_secs).await
}

/// Register a new user account.
///
/// Issues an access token only — no refresh token. A registrant starts
/// the rotation chain on first login.
pub async fn register(
    pool: &PgPool,
    username: &str,
    email: &str,
    password: &str,
    jwt_secret: &[u8],
) -> AppResult<AuthResponse> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if queries::username_exists(pool, username).await? {
        return Err(AuthError::DuplicateIdentity { field: "username" }.into());
    }
    if queries::email_exists(pool, email).await? {
        return Err(AuthError::DuplicateIdentity { field: "email" }.into());
    }

    let pw_hash = hash_password(password)?;
    let user = queries::create_user(pool, username, email, &pw_hash, Role::User).await?;
    info!(username, "registered new user");

    let access = jwt::issue(&user.username, user.role, jwt_secret)?;
    Ok(build_auth_response(&user, access, None))
}

/// Exchange a refresh token for a new token pair (single-use rotation).
///
/// The old record is consumed either by the expiry check (expired) or by
/// the ledger's delete-before-create when the new token is issued.
pub async fn refresh(
    pool: &PgPool,
    refresh_token: &str,
    jwt_secret: &[u8],
    refresh_ttl_secs: i64,
) -> AppResult<AuthResponse> {
    let record = ledger::lookup(pool, refresh_token).await?;
    let record = ledger::check_not_expired(pool, record).await?;

    let user = queries::find_by_id(pool, record.user_id)
        .await?
        .ok_or(AuthError::TokenNotFound)?;
    if !user.enabled {
        return Err(AuthError::InvalidCredentials.into());
    }

    issue_session(pool, &user, jwt_secret, refresh_ttl_secs).await
}

/// Logout — soft-revoke a specific refresh token when supplied.
pub async fn logout(pool: &PgPool, refresh_token: Option<&str>) -> AppResult<LogoutResponse> {
    if let Some(token) = refresh_token {
        ledger::revoke(pool, token).await?;
    }
    Ok(LogoutResponse { success: true })
}

/// Profile view for the authenticated caller.
pub async fn current_user(pool: &PgPool, username: &str) -> AppResult<UserResponse> {
    let user = queries::find_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user not found: {username}")))?;
    Ok(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role.as_str().to_string(),
        enabled: user.enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: uuid::Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@x.com".into(),
            password_hash: "hash".into(),
            role: Role::User,
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn response_carries_bearer_type_and_user_fields() {
        let user = sample_user();
        let access = jwt::issue(&user.username, user.role, b"s").unwrap();
        let resp = build_auth_response(&user, access, Some("refresh".into()));
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.username, "alice");
        assert_eq!(resp.role, "USER");
        assert_eq!(resp.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn registration_shape_has_no_refresh_token() {
        let user = sample_user();
        let access = jwt::issue(&user.username, user.role, b"s").unwrap();
        let resp = build_auth_response(&user, access, None);
        assert!(resp.refresh_token.is_none());
    }
}
