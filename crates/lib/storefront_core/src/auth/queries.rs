//! Credential-store queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{Role, User};

type UserRow = (
    Uuid,
    String,
    String,
    String,
    String,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn map_user(row: UserRow) -> Result<User, AuthError> {
    let (id, username, email, password_hash, role, enabled, created_at, updated_at) = row;
    let role = role
        .parse::<Role>()
        .map_err(|e| AuthError::Internal(e.to_string()))?;
    Ok(User {
        id,
        username,
        email,
        password_hash,
        role,
        enabled,
        created_at,
        updated_at,
    })
}

/// Fetch a user by username or email (login identifier).
pub async fn find_by_username_or_email(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, role, enabled, created_at, updated_at \
         FROM users WHERE username = $1 OR email = $1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;
    row.map(map_user).transpose()
}

/// Fetch a user by username.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, role, enabled, created_at, updated_at \
         FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    row.map(map_user).transpose()
}

/// Fetch a user by email.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, role, enabled, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    row.map(map_user).transpose()
}

/// Fetch a user by ID.
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, role, enabled, created_at, updated_at \
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    row.map(map_user).transpose()
}

/// Check whether a username is already taken.
pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Create a new enabled user, returning the stored record.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (username, email, password_hash, role) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, username, email, password_hash, role, enabled, created_at, updated_at",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;
    map_user(row)
}

/// Re-sync an OAuth2-authenticated user's display username on login.
/// Role and password are never touched here.
pub async fn sync_oauth_profile(
    pool: &PgPool,
    user_id: Uuid,
    username: &str,
) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET username = $2, updated_at = now() \
         WHERE id = $1 \
         RETURNING id, username, email, password_hash, role, enabled, created_at, updated_at",
    )
    .bind(user_id)
    .bind(username)
    .fetch_one(pool)
    .await?;
    map_user(row)
}
