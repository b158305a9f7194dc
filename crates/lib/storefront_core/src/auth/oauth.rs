//! OAuth2 account bridge.
//!
//! Translates a provider's userinfo claim document into a local user
//! record, creating or re-syncing it. Token issuance then flows through
//! the same path as password login, so provider-originated sessions are
//! indistinguishable downstream.

use std::str::FromStr;

use sqlx::PgPool;

use super::{AuthError, queries};
use crate::models::auth::{OAUTH2_PASSWORD_SENTINEL, Role, User};

/// Supported identity providers. Closed set; unknown names fail with
/// `UnsupportedProvider`, which surfaces as a server error (it indicates
/// misconfiguration, not user error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Github,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Google, Provider::Github];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Github => "github",
        }
    }
}

impl FromStr for Provider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "github" => Ok(Provider::Github),
            other => Err(AuthError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Per-provider claim extraction rule.
struct ClaimRule {
    email: &'static str,
    username: &'static str,
    default_role: Role,
}

const fn claim_rule(provider: Provider) -> ClaimRule {
    match provider {
        Provider::Google => ClaimRule {
            email: "email",
            username: "name",
            default_role: Role::User,
        },
        Provider::Github => ClaimRule {
            email: "email",
            username: "login",
            default_role: Role::User,
        },
    }
}

/// Identity asserted by a provider, reduced to the local user shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    pub email: String,
    pub username: String,
    pub role: Role,
}

/// Extract the local identity from a provider's userinfo claim document.
pub fn extract_identity(
    provider: Provider,
    claims: &serde_json::Value,
) -> Result<FederatedIdentity, AuthError> {
    let rule = claim_rule(provider);
    let claim_str = |key: &'static str| {
        claims.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
            AuthError::Internal(format!(
                "{} userinfo missing '{key}' claim",
                provider.as_str()
            ))
        })
    };
    Ok(FederatedIdentity {
        email: claim_str(rule.email)?.to_string(),
        username: claim_str(rule.username)?.to_string(),
        role: rule.default_role,
    })
}

/// Resolve a federated identity to a local user record.
///
/// An existing user (matched by email) gets its display username
/// re-synced and `updated_at` bumped; role and password are untouched.
/// A new user is created with the sentinel password, role USER, enabled.
pub async fn resolve_user(
    pool: &PgPool,
    identity: &FederatedIdentity,
) -> Result<User, AuthError> {
    if let Some(existing) = queries::find_by_email(pool, &identity.email).await? {
        return queries::sync_oauth_profile(pool, existing.id, &identity.username).await;
    }
    queries::create_user(
        pool,
        &identity.username,
        &identity.email,
        OAUTH2_PASSWORD_SENTINEL,
        identity.role,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("GitHub".parse::<Provider>().unwrap(), Provider::Github);
        assert_eq!("GOOGLE".parse::<Provider>().unwrap(), Provider::Google);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = "facebook".parse::<Provider>().unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedProvider(ref p) if p == "facebook"));
    }

    #[test]
    fn google_identity_uses_name_claim() {
        let claims = serde_json::json!({
            "email": "alice@x.com",
            "name": "Alice Example",
            "sub": "1234",
        });
        let identity = extract_identity(Provider::Google, &claims).unwrap();
        assert_eq!(identity.email, "alice@x.com");
        assert_eq!(identity.username, "Alice Example");
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn github_identity_uses_login_claim() {
        let claims = serde_json::json!({
            "email": "bob@x.com",
            "login": "bob-dev",
            "name": "Bob",
        });
        let identity = extract_identity(Provider::Github, &claims).unwrap();
        assert_eq!(identity.username, "bob-dev");
    }

    #[test]
    fn missing_claim_is_an_internal_error() {
        let claims = serde_json::json!({ "name": "No Email" });
        let err = extract_identity(Provider::Google, &claims).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
