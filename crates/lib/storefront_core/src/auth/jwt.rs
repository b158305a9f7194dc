//! JWT access-token codec: issuance, verification and secret resolution.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::info;

use super::AuthError;
use crate::models::auth::{AccessTokenClaims, Role};

/// Access token lifetime: 24 hours.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// A freshly signed access token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue a signed JWT access token (HS256, 24 hour expiry) for the
/// given subject and role.
pub fn issue(username: &str, role: Role, secret: &[u8]) -> Result<IssuedAccessToken, AuthError> {
    issue_at(username, role, secret, Utc::now())
}

fn issue_at(
    username: &str,
    role: Role,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<IssuedAccessToken, AuthError> {
    let expires_at = now + Duration::seconds(ACCESS_TOKEN_TTL_SECS);
    let claims = AccessTokenClaims {
        sub: username.to_string(),
        role: role.as_str().to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))?;
    Ok(IssuedAccessToken { token, expires_at })
}

/// Verify a JWT access token, returning the claims on success.
///
/// Fails with `InvalidSignature` on a signature mismatch, `TokenExpired`
/// when `exp <= now` (zero leeway, the boundary instant counts as
/// expired), and `TokenMalformed` for anything structurally undecodable.
pub fn verify(token: &str, secret: &[u8]) -> Result<AccessTokenClaims, AuthError> {
    verify_at(token, secret, Utc::now())
}

fn verify_at(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<AccessTokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked manually below: jsonwebtoken's built-in check has
    // a default 60s leeway and an exclusive boundary.
    validation.validate_exp = false;
    let data = decode::<AccessTokenClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::TokenMalformed,
    })?;
    if data.claims.exp <= now.timestamp() {
        return Err(AuthError::TokenExpired);
    }
    Ok(data.claims)
}

/// Best-effort subject extraction without signature trust.
///
/// Used only as a pre-check before full verification against a live user
/// record; callers must never treat the result as authorization.
pub fn extract_subject(token: &str) -> Option<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    decode::<AccessTokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims.sub)
}

/// Resolve the JWT signing secret: env var `JWT_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    // Generate and persist
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storefront")
        .join("jwt-secret")
}
