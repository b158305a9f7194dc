//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API request and
//! response DTOs in `storefront_api` (which carry `#[serde(rename)]`
//! for camelCase etc.).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentinel stored in `password_hash` for accounts created through an
/// OAuth2 provider. It is not a valid bcrypt hash, so such accounts can
/// never pass password login.
pub const OAUTH2_PASSWORD_SENTINEL: &str = "OAUTH2_USER";

/// User role. Closed set; unknown tags are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Role tag stored in the database did not match the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role tag: {0}")]
pub struct UnknownRole(pub String);

/// Domain user as stored in the credential store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Whether this account has a real local password, as opposed to the
    /// provider-managed sentinel.
    pub fn has_local_password(&self) -> bool {
        self.password_hash != OAUTH2_PASSWORD_SENTINEL
    }
}

/// Refresh token record stored in the database. `token_hash` is the
/// SHA-256 digest of the opaque token; the plaintext is never persisted.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub token_hash: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub revoked: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject — username (standard JWT `sub` claim).
    pub sub: String,
    /// Role tag (e.g. `USER`).
    pub role: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}
