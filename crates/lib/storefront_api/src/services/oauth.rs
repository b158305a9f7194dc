//! OAuth2 bridge service — claim mapping and account resolution, ending
//! in the same session-issuance path as password login.

use sqlx::PgPool;
use tracing::info;

use storefront_core::auth::oauth::{Provider, extract_identity, resolve_user};

use crate::error::AppResult;
use crate::models::{AuthResponse, OAuthProvidersResponse, ProviderInfo};
use crate::services::auth::issue_session;

/// Complete an OAuth2 login from a provider's userinfo claim document.
pub async fn login(
    pool: &PgPool,
    provider: &str,
    claims: &serde_json::Value,
    jwt_secret: &[u8],
    refresh_ttl_secs: i64,
) -> AppResult<AuthResponse> {
    let provider = provider.parse::<Provider>()?;
    let identity = extract_identity(provider, claims)?;
    let user = resolve_user(pool, &identity).await?;
    info!(provider = provider.as_str(), username = %user.username, "OAuth2 login resolved");
    issue_session(pool, &user, jwt_secret, refresh_ttl_secs).await
}

/// The configured provider listing.
pub fn providers() -> OAuthProvidersResponse {
    OAuthProvidersResponse {
        providers: Provider::ALL
            .iter()
            .map(|p| ProviderInfo {
                name: p.as_str().to_string(),
                url: format!("/auth/oauth2/{}", p.as_str()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_every_supported_provider() {
        let listing = providers();
        let names: Vec<_> = listing.providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["google", "github"]);
        assert!(listing.providers.iter().all(|p| p.url.starts_with("/auth/oauth2/")));
    }
}
