//! Refresh-token ledger.
//!
//! Persisted, single-active-token-per-user rotation: issuing a token for
//! a user deletes any prior token inside the same transaction, so at
//! most one valid refresh token exists per user at any instant. Tokens
//! are stored as SHA-256 digests; the plaintext leaves this module
//! exactly once, in the issue response.

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::RefreshTokenRecord;

/// Default refresh token lifetime: 7 days.
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Opaque token length; 64 alphanumeric chars carry well over 128 bits
/// of entropy.
const TOKEN_LEN: usize = 64;

/// A freshly issued refresh token: the plaintext handed to the client
/// plus the persisted record.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub record: RefreshTokenRecord,
}

/// Generate a cryptographically random opaque token.
fn generate_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 hash a token for storage and lookup.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether a record's expiry has passed. The boundary instant counts as
/// expired.
pub fn is_expired(record: &RefreshTokenRecord, now: DateTime<Utc>) -> bool {
    record.expires_at <= now
}

/// Issue a new refresh token for a user, rotating out any prior one.
///
/// Delete and insert run in a single transaction so two concurrent
/// issues for the same user cannot leave two live tokens (or zero).
pub async fn issue(
    pool: &PgPool,
    user_id: Uuid,
    ttl_secs: i64,
) -> Result<IssuedRefreshToken, AuthError> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::seconds(ttl_secs);

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
        "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) \
         VALUES ($1, $2, $3) RETURNING id, created_at",
    )
    .bind(user_id)
    .bind(&token_hash)
    .bind(expires_at)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(IssuedRefreshToken {
        token,
        record: RefreshTokenRecord {
            id: row.0,
            user_id,
            token_hash,
            expires_at,
            revoked: false,
            created_at: row.1,
        },
    })
}

/// Look up a refresh token by its plaintext value.
///
/// Revoked rows deliberately read as `TokenNotFound`, indistinguishable
/// from missing ones.
pub async fn lookup(pool: &PgPool, token: &str) -> Result<RefreshTokenRecord, AuthError> {
    let token_hash = hash_token(token);
    let row = sqlx::query_as::<_, (Uuid, Uuid, DateTime<Utc>, DateTime<Utc>)>(
        "SELECT id, user_id, expires_at, created_at \
         FROM refresh_tokens \
         WHERE token_hash = $1 AND revoked = FALSE",
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    let (id, user_id, expires_at, created_at) = row.ok_or(AuthError::TokenNotFound)?;
    Ok(RefreshTokenRecord {
        id,
        user_id,
        token_hash,
        expires_at,
        revoked: false,
        created_at,
    })
}

/// Fail with `TokenExpired` if the record's expiry has passed, deleting
/// the record as a side effect; otherwise return it unchanged.
///
/// A second attempt with the same token string then fails at `lookup`
/// with `TokenNotFound` rather than `TokenExpired`.
pub async fn check_not_expired(
    pool: &PgPool,
    record: RefreshTokenRecord,
) -> Result<RefreshTokenRecord, AuthError> {
    if is_expired(&record, Utc::now()) {
        sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(record.id)
            .execute(pool)
            .await?;
        return Err(AuthError::TokenExpired);
    }
    Ok(record)
}

/// Soft-revoke a token in place (explicit logout), distinct from the
/// hard-delete rotation path.
pub async fn revoke(pool: &PgPool, token: &str) -> Result<(), AuthError> {
    sqlx::query(
        "UPDATE refresh_tokens SET revoked = TRUE \
         WHERE token_hash = $1 AND revoked = FALSE",
    )
    .bind(hash_token(token))
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a user's refresh token outright, for account security events
/// such as a password change.
pub async fn revoke_all(pool: &PgPool, user_id: Uuid) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Bulk-delete every token whose expiry has passed. Invoked by the
/// server's scheduled purge task, never from request handling.
pub async fn purge_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<u64, AuthError> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_long_alphanumeric_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn hashing_is_stable_and_hex_encoded() {
        let h1 = hash_token("some-token");
        let h2 = hash_token("some-token");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash_token("other-token"), h1);
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: hash_token("t"),
            expires_at: now,
            revoked: false,
            created_at: now - Duration::days(7),
        };
        assert!(is_expired(&record, now));
        assert!(!is_expired(&record, now - Duration::seconds(1)));
        assert!(is_expired(&record, now + Duration::seconds(1)));
    }
}
