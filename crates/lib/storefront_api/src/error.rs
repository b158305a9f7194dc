//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<storefront_core::auth::AuthError> for AppError {
    fn from(e: storefront_core::auth::AuthError) -> Self {
        use storefront_core::auth::AuthError::*;
        match e {
            // Every credential and token failure collapses into the same
            // generic unauthorized response; the internal kind is logged
            // here and nowhere else, to avoid oracle attacks.
            e @ (InvalidCredentials | TokenExpired | TokenNotFound | TokenMalformed
            | InvalidSignature) => {
                tracing::debug!(reason = %e, "authentication rejected");
                AppError::Unauthorized("Unauthorized".into())
            }
            UnsupportedProvider(provider) => {
                tracing::error!(provider, "unsupported OAuth2 provider configured");
                AppError::Internal(format!("unsupported OAuth2 provider: {provider}"))
            }
            DuplicateIdentity { field } => AppError::Validation(format!("{field} already exists")),
            Db(e) => AppError::from(e),
            Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::auth::AuthError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn token_failures_are_indistinguishable_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::TokenNotFound,
            AuthError::TokenMalformed,
            AuthError::InvalidSignature,
        ] {
            let app_err = AppError::from(err);
            match &app_err {
                AppError::Unauthorized(m) => assert_eq!(m, "Unauthorized"),
                other => panic!("expected Unauthorized, got {other:?}"),
            }
            assert_eq!(status_of(app_err), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn unsupported_provider_is_a_server_error() {
        let app_err = AppError::from(AuthError::UnsupportedProvider("facebook".into()));
        assert_eq!(status_of(app_err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn duplicate_identity_names_the_field() {
        let app_err = AppError::from(AuthError::DuplicateIdentity { field: "email" });
        match &app_err {
            AppError::Validation(m) => assert_eq!(m, "email already exists"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(status_of(app_err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let resp = AppError::Internal("secret detail".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
