use launchkit_core::auth::OAuthProvider;
use url::Url;

use crate::error::AuthError;

/// Path of the OAuth callback route on this site.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Path of the user sync endpoint the callback posts to.
pub const SYNC_PATH: &str = "/api/users/sync";

#[cfg(feature = "mock")]
const DEFAULT_PROVIDER_URL: Option<&str> = Some("http://localhost:3001");
#[cfg(not(feature = "mock"))]
const DEFAULT_PROVIDER_URL: Option<&str> = None;

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Root URL of the hosted identity provider.
    pub provider_url: Url,
    /// Public API key sent to the provider with every request.
    pub api_key: String,
    /// Social login offered on the login page.
    pub oauth_provider: OAuthProvider,
    /// Public origin of this site, used for callback and sync URLs.
    pub base_url: Url,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Configuration with defaults for everything but the two URLs.
    pub fn new(provider_url: Url, base_url: Url) -> Self {
        Self {
            provider_url,
            api_key: String::new(),
            oauth_provider: OAuthProvider::Google,
            base_url,
            cookie_name: "session".to_string(),
            cookie_secure: true,
        }
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AUTH_BASE_URL`: Public origin of the site (default: `http://localhost:3000`)
    /// - `IDENTITY_PROVIDER_URL`: Root URL of the hosted identity provider
    ///   (required, defaults to the local mock IdP when built with `mock`)
    /// - `IDENTITY_PROVIDER_API_KEY`: Public API key for the provider (default: empty)
    /// - `OAUTH_PROVIDER`: `google`, `github` or `apple` (default: `google`)
    /// - `SESSION_COOKIE_NAME`: Name of the session cookie (default: `session`)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: true)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` if a URL does not parse, the provider URL is
    /// missing, or `OAUTH_PROVIDER` names an unknown provider.
    pub fn from_env() -> Result<Self, AuthError> {
        let base_url = parse_url(
            "AUTH_BASE_URL",
            std::env::var("AUTH_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        )?;

        let provider_url = match std::env::var("IDENTITY_PROVIDER_URL") {
            Ok(value) => parse_url("IDENTITY_PROVIDER_URL", value)?,
            Err(_) => match DEFAULT_PROVIDER_URL {
                Some(default) => parse_url("IDENTITY_PROVIDER_URL", default.to_string())?,
                None => {
                    return Err(AuthError::Config(
                        "IDENTITY_PROVIDER_URL must be set".to_string(),
                    ))
                }
            },
        };

        let oauth_provider = match std::env::var("OAUTH_PROVIDER") {
            Ok(value) => value.parse().map_err(AuthError::Config)?,
            Err(_) => OAuthProvider::Google,
        };

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Ok(Self {
            provider_url,
            api_key: std::env::var("IDENTITY_PROVIDER_API_KEY").unwrap_or_default(),
            oauth_provider,
            base_url,
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "session".to_string()),
            cookie_secure,
        })
    }

    /// Absolute URL the provider redirects back to after consent.
    pub fn callback_url(&self) -> Result<Url, AuthError> {
        self.base_url
            .join(CALLBACK_PATH)
            .map_err(|e| AuthError::Config(e.to_string()))
    }

    /// Absolute URL of the user sync endpoint.
    pub fn sync_url(&self) -> Result<Url, AuthError> {
        self.base_url
            .join(SYNC_PATH)
            .map_err(|e| AuthError::Config(e.to_string()))
    }

    /// Cookie holding the PKCE verifier between login and callback.
    pub fn verifier_cookie_name(&self) -> String {
        format!("{}-code-verifier", self.cookie_name)
    }
}

fn parse_url(var: &str, value: String) -> Result<Url, AuthError> {
    value
        .parse()
        .map_err(|e| AuthError::Config(format!("{var} must be a valid URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig::new(
            Url::parse("https://idp.example.com").unwrap(),
            Url::parse("https://www.example.com").unwrap(),
        )
    }

    #[test]
    fn callback_url_is_on_base_url() {
        assert_eq!(
            config().callback_url().unwrap().as_str(),
            "https://www.example.com/auth/callback"
        );
    }

    #[test]
    fn sync_url_is_on_base_url() {
        assert_eq!(
            config().sync_url().unwrap().as_str(),
            "https://www.example.com/api/users/sync"
        );
    }

    #[test]
    fn verifier_cookie_follows_session_cookie_name() {
        let mut config = config();
        config.cookie_name = "sb".to_string();
        assert_eq!(config.verifier_cookie_name(), "sb-code-verifier");
    }

    #[test]
    fn parse_url_reports_variable_name() {
        let err = parse_url("AUTH_BASE_URL", "not a url".to_string()).unwrap_err();
        assert!(err.to_string().contains("AUTH_BASE_URL"));
    }
}
