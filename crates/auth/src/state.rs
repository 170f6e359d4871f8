//! Application state for auth.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::CookieJar;
use launchkit_core::auth::{parse_bearer_token, IdentityProvider, SessionToken};

use crate::client::AuthClient;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::sync::{HttpUserSyncClient, UserSyncClient};

#[cfg(not(feature = "mock"))]
use crate::providers::HostedProvider;

#[cfg(feature = "mock")]
use crate::providers::MockProvider;

/// Shared state for auth handlers.
///
/// Holds only configuration and connection-pooling clients. Anything tied
/// to a user lives in the per-request [`AuthClient`].
#[derive(Clone)]
pub struct AuthState {
    provider: Arc<dyn IdentityProvider>,
    sync: Arc<dyn UserSyncClient>,
    pub config: AuthConfig,
}

impl AuthState {
    /// Creates a new AuthState talking to the hosted provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider client cannot be built or the sync
    /// URL cannot be derived from the base URL.
    #[cfg(not(feature = "mock"))]
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let provider = HostedProvider::new(&config)?;
        let sync = HttpUserSyncClient::new(config.sync_url()?);

        Ok(Self::from_parts(Arc::new(provider), Arc::new(sync), config))
    }

    /// Creates a new AuthState with the mock provider for development.
    #[cfg(feature = "mock")]
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let provider = MockProvider::new(config.provider_url.clone());
        let sync = HttpUserSyncClient::new(config.sync_url()?);

        Ok(Self::from_parts(Arc::new(provider), Arc::new(sync), config))
    }

    /// Assembles state from explicit collaborators.
    pub fn from_parts(
        provider: Arc<dyn IdentityProvider>,
        sync: Arc<dyn UserSyncClient>,
        config: AuthConfig,
    ) -> Self {
        Self {
            provider,
            sync,
            config,
        }
    }

    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }

    pub fn sync_client(&self) -> &dyn UserSyncClient {
        self.sync.as_ref()
    }

    /// Builds an auth client for one request.
    ///
    /// The session token comes from the `Authorization: Bearer` header
    /// (server-to-server and API callers) or, failing that, the session
    /// cookie (browsers).
    pub fn client(&self, headers: &HeaderMap) -> AuthClient {
        AuthClient::new(self.provider.clone(), self.session_token(headers))
    }

    fn session_token(&self, headers: &HeaderMap) -> Option<SessionToken> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer_token);

        bearer.or_else(|| {
            CookieJar::from_headers(headers)
                .get(&self.config.cookie_name)
                .map(|cookie| cookie.value().to_string())
                .filter(|value| !value.is_empty())
                .map(SessionToken::new)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::{header::COOKIE, HeaderValue};
    use launchkit_core::auth::{Identity, OAuthProvider, ProviderSession, Result};
    use launchkit_core::users::{SyncUserRequest, UserRecord};
    use url::Url;

    /// Provider that knows exactly one token.
    struct SingleTokenProvider;

    #[async_trait]
    impl IdentityProvider for SingleTokenProvider {
        fn authorization_url(&self, _: OAuthProvider, redirect_to: &Url, _: &str) -> Result<Url> {
            Ok(redirect_to.clone())
        }

        async fn exchange_code(&self, _: &str, _: Option<&str>) -> Result<ProviderSession> {
            unreachable!("not used in these tests")
        }

        async fn get_user(&self, token: &SessionToken) -> Result<Option<Identity>> {
            Ok((token.as_str() == "good").then(|| Identity::new("u1", "a@x.com")))
        }

        async fn sign_out(&self, _: &SessionToken) -> Result<()> {
            Ok(())
        }
    }

    struct NoSync;

    #[async_trait]
    impl UserSyncClient for NoSync {
        async fn sync_user(
            &self,
            _: &SessionToken,
            _: &SyncUserRequest,
        ) -> std::result::Result<UserRecord, AuthError> {
            Err(AuthError::Http("not used".to_string()))
        }
    }

    fn state() -> AuthState {
        let config = AuthConfig::new(
            Url::parse("https://idp.example.com").unwrap(),
            Url::parse("https://www.example.com").unwrap(),
        );
        AuthState::from_parts(Arc::new(SingleTokenProvider), Arc::new(NoSync), config)
    }

    #[tokio::test]
    async fn client_reads_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; session=good"));

        let client = state().client(&headers);

        assert_eq!(client.token().map(|t| t.as_str()), Some("good"));
        assert_eq!(client.get_user().await.unwrap().unwrap().id, "u1");
    }

    #[tokio::test]
    async fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer good"));
        headers.insert(COOKIE, HeaderValue::from_static("session=stale"));

        let client = state().client(&headers);

        assert_eq!(client.token().map(|t| t.as_str()), Some("good"));
    }

    #[tokio::test]
    async fn client_without_session_has_no_user() {
        let client = state().client(&HeaderMap::new());

        assert!(client.token().is_none());
        assert_eq!(client.get_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clients_do_not_share_tokens() {
        let state = state();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session=good"));

        let signed_in = state.client(&headers);
        let anonymous = state.client(&HeaderMap::new());

        assert!(signed_in.get_user().await.unwrap().is_some());
        assert!(anonymous.get_user().await.unwrap().is_none());
    }
}
