use async_trait::async_trait;
use url::Url;

use super::{AuthError, Identity, OAuthProvider, ProviderSession, SessionToken};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Abstraction over the hosted identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Builds the URL the browser is sent to in order to start a social login.
    fn authorization_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &Url,
        pkce_challenge: &str,
    ) -> Result<Url>;

    /// Exchanges a one-time authorization code for a provider session.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<ProviderSession>;

    /// Returns the identity behind a token.
    ///
    /// `Ok(None)` means the provider does not recognise the token (expired,
    /// revoked or malformed). `Err` is reserved for failures to get an answer.
    async fn get_user(&self, token: &SessionToken) -> Result<Option<Identity>>;

    /// Revokes the session behind a token.
    async fn sign_out(&self, token: &SessionToken) -> Result<()>;
}
