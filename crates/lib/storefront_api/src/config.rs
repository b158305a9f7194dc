//! API server configuration.

use storefront_core::auth::jwt::resolve_jwt_secret;
use storefront_core::auth::refresh::DEFAULT_REFRESH_TOKEN_TTL_SECS;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_secs: i64,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                                  |
    /// |--------------------------|------------------------------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:8080`                         |
    /// | `DATABASE_URL`           | `postgres://localhost:5432/storefront`   |
    /// | `JWT_SECRET`             | generated & persisted to file            |
    /// | `REFRESH_TOKEN_TTL_SECS` | `604800` (7 days)                        |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/storefront".into()),
            jwt_secret: resolve_jwt_secret(),
            refresh_token_ttl_secs: std::env::var("REFRESH_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        }
    }
}
