//! Mock identity provider for development and testing.
//!
//! Stateless: authorization codes are the identity itself, base64-encoded,
//! and access tokens are the code with a `mock.` prefix. Works together with
//! the Mock IdP server for local development.

use async_trait::async_trait;
use base64::Engine;
use launchkit_core::auth::{
    AuthError, Identity, IdentityProvider, OAuthProvider, ProviderSession, Result, SessionToken,
};
use url::Url;

const TOKEN_PREFIX: &str = "mock.";
const TOKEN_TTL_SECS: u64 = 60 * 60;

/// Mock provider that works with MockIdpServer.
pub struct MockProvider {
    mock_idp_url: Url,
}

impl MockProvider {
    /// Create a new MockProvider.
    ///
    /// * `mock_idp_url` - The URL of the Mock IdP server (e.g., http://localhost:3001)
    pub fn new(mock_idp_url: Url) -> Self {
        Self { mock_idp_url }
    }

    /// The authorization code the mock IdP hands out for `identity`.
    pub fn code_for(identity: &Identity) -> String {
        let json = serde_json::to_vec(identity).unwrap_or_default();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json)
    }

    /// The access token a successful exchange yields for `identity`.
    pub fn token_for(identity: &Identity) -> SessionToken {
        SessionToken::new(format!("{TOKEN_PREFIX}{}", Self::code_for(identity)))
    }

    fn decode(encoded: &str) -> std::result::Result<Identity, String> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| e.to_string())?;
        serde_json::from_slice(&bytes).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn authorization_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &Url,
        pkce_challenge: &str,
    ) -> Result<Url> {
        let mut url = self
            .mock_idp_url
            .join("/authorize")
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("provider", &provider.to_string())
            .append_pair("redirect_to", redirect_to.as_str())
            .append_pair("code_challenge", pkce_challenge);

        Ok(url)
    }

    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> Result<ProviderSession> {
        let user = Self::decode(code).map_err(AuthError::CodeExchange)?;

        Ok(ProviderSession {
            access_token: format!("{TOKEN_PREFIX}{code}"),
            refresh_token: None,
            expires_in: TOKEN_TTL_SECS,
            user,
        })
    }

    async fn get_user(&self, token: &SessionToken) -> Result<Option<Identity>> {
        Ok(token
            .as_str()
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|encoded| Self::decode(encoded).ok()))
    }

    async fn sign_out(&self, _token: &SessionToken) -> Result<()> {
        Ok(())
    }
}
