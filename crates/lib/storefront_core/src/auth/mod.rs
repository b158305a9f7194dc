//! Authentication and token-lifecycle logic.
//!
//! Provides password hashing, the JWT access-token codec, the
//! refresh-token ledger and OAuth2 account bridging, shared across the
//! API crates.

pub mod jwt;
pub mod oauth;
pub mod password;
pub mod queries;
pub mod refresh;

use thiserror::Error;

/// Authentication errors.
///
/// The HTTP boundary collapses every credential and token variant into a
/// generic unauthorized response; the distinctions exist for logging and
/// for tests only.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("token not found")]
    TokenNotFound,

    #[error("malformed token")]
    TokenMalformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("unsupported OAuth2 provider: {0}")]
    UnsupportedProvider(String),

    #[error("{field} already exists")]
    DuplicateIdentity { field: &'static str },

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
