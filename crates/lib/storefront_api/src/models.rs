//! API request and response DTOs (camelCase on the wire).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Token-pair response shared by login, refresh and the OAuth2 bridge.
/// Registration returns it without a refresh token (field omitted).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct OAuthProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_omits_absent_refresh_token() {
        let resp = AuthResponse {
            access_token: "token".into(),
            refresh_token: None,
            token_type: "Bearer".into(),
            user_id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@x.com".into(),
            role: "USER".into(),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("refreshToken").is_none());
        assert_eq!(json["tokenType"], "Bearer");
        assert!(json.get("accessToken").is_some());
        assert!(json.get("expiresAt").is_some());
    }

    #[test]
    fn login_request_accepts_camel_case() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"usernameOrEmail": "alice", "password": "pw123456"}"#,
        )
        .unwrap();
        assert_eq!(req.username_or_email, "alice");
    }
}
