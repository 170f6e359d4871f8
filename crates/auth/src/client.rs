//! Request-scoped auth client.

use std::sync::Arc;

use launchkit_core::auth::{Identity, IdentityProvider, ProviderSession, SessionToken};

use crate::error::AuthError;

/// Auth client bound to a single request.
///
/// Built by [`AuthState::client`](crate::AuthState::client) from the
/// request's cookies or bearer token and dropped with the request. The
/// shared provider never holds an identity, so nothing can leak between
/// requests.
pub struct AuthClient {
    provider: Arc<dyn IdentityProvider>,
    token: Option<SessionToken>,
}

impl AuthClient {
    pub(crate) fn new(provider: Arc<dyn IdentityProvider>, token: Option<SessionToken>) -> Self {
        Self { provider, token }
    }

    /// The session token this client acts with, if any.
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Exchange an authorization code and adopt the resulting session.
    pub async fn exchange_code_for_session(
        &mut self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<ProviderSession, AuthError> {
        let session = self.provider.exchange_code(code, code_verifier).await?;
        self.token = Some(SessionToken::new(session.access_token.clone()));
        Ok(session)
    }

    /// The identity behind this client's session. `Ok(None)` without one.
    pub async fn get_user(&self) -> Result<Option<Identity>, AuthError> {
        match &self.token {
            Some(token) => Ok(self.provider.get_user(token).await?),
            None => Ok(None),
        }
    }

    /// Revoke this client's session with the provider. No-op without one.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(token) = &self.token {
            self.provider.sign_out(token).await?;
        }
        Ok(())
    }
}
