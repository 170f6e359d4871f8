//! Hosted identity provider client (GoTrue-style REST API).

use async_trait::async_trait;
use launchkit_core::auth::{
    AuthError, Identity, IdentityProvider, OAuthProvider, ProviderSession, Result, SessionToken,
};
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::config::AuthConfig;

const AUTHORIZE_PATH: &str = "/auth/v1/authorize";
const TOKEN_PATH: &str = "/auth/v1/token";
const USER_PATH: &str = "/auth/v1/user";
const LOGOUT_PATH: &str = "/auth/v1/logout";

#[derive(Serialize)]
struct PkceTokenRequest<'a> {
    auth_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
}

/// Client for the hosted auth service.
///
/// Holds no identity of its own: every call that needs one takes the
/// caller's token as an argument.
pub struct HostedProvider {
    http_client: reqwest::Client,
    provider_url: Url,
    api_key: String,
}

impl HostedProvider {
    /// Create a new hosted provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        // Build HTTP client without redirect following (security requirement)
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            provider_url: config.provider_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.provider_url
            .join(path)
            .map_err(|e| AuthError::Provider(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for HostedProvider {
    fn authorization_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &Url,
        pkce_challenge: &str,
    ) -> Result<Url> {
        let mut url = self.endpoint(AUTHORIZE_PATH)?;
        url.query_pairs_mut()
            .append_pair("provider", &provider.to_string())
            .append_pair("redirect_to", redirect_to.as_str())
            .append_pair("code_challenge", pkce_challenge)
            .append_pair("code_challenge_method", "s256");
        Ok(url)
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<ProviderSession> {
        let mut url = self.endpoint(TOKEN_PATH)?;
        url.query_pairs_mut().append_pair("grant_type", "pkce");

        let response = self
            .http_client
            .post(url)
            .header("apikey", &self.api_key)
            .json(&PkceTokenRequest {
                auth_code: code,
                code_verifier,
            })
            .send()
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::CodeExchange(format!("{status}: {body}")));
        }

        response
            .json::<ProviderSession>()
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))
    }

    async fn get_user(&self, token: &SessionToken) -> Result<Option<Identity>> {
        let response = self
            .http_client
            .get(self.endpoint(USER_PATH)?)
            .header("apikey", &self.api_key)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(AuthError::Provider(format!("{status}: {body}")));
            }
            _ => {}
        }

        response
            .json::<Identity>()
            .await
            .map(Some)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<()> {
        let response = self
            .http_client
            .post(self.endpoint(LOGOUT_PATH)?)
            .header("apikey", &self.api_key)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            // Already gone on the provider side.
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(AuthError::Provider(format!("logout failed: {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> HostedProvider {
        let config = AuthConfig::new(
            Url::parse("https://idp.example.com").unwrap(),
            Url::parse("https://www.example.com").unwrap(),
        );
        HostedProvider::new(&config).unwrap()
    }

    #[test]
    fn authorization_url_carries_provider_and_pkce() {
        let redirect_to = Url::parse("https://www.example.com/auth/callback").unwrap();

        let url = provider()
            .authorization_url(OAuthProvider::Github, &redirect_to, "challenge-123")
            .unwrap();

        assert_eq!(url.path(), "/auth/v1/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("provider".to_string(), "github".to_string())));
        assert!(pairs.contains(&(
            "redirect_to".to_string(),
            "https://www.example.com/auth/callback".to_string()
        )));
        assert!(pairs.contains(&("code_challenge".to_string(), "challenge-123".to_string())));
        assert!(pairs.contains(&("code_challenge_method".to_string(), "s256".to_string())));
    }

    #[test]
    fn token_request_omits_missing_verifier() {
        let body = serde_json::to_value(PkceTokenRequest {
            auth_code: "abc123",
            code_verifier: None,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "auth_code": "abc123" }));
    }

    #[test]
    fn provider_session_parses_hosted_token_response() {
        let body = serde_json::json!({
            "access_token": "at",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt",
            "user": {
                "id": "u1",
                "aud": "authenticated",
                "email": "a@x.com",
                "user_metadata": { "full_name": "Jane" }
            }
        });

        let session: ProviderSession = serde_json::from_value(body).unwrap();

        assert_eq!(session.access_token, "at");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.id, "u1");
        assert_eq!(session.user.user_metadata["full_name"], "Jane");
    }
}
