//! Cookie construction for the session and the PKCE verifier.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::AuthConfig;

/// How long a login attempt may take before the verifier cookie expires.
const VERIFIER_TTL_MINUTES: i64 = 10;

/// Session cookie carrying the provider's access token.
pub fn session_cookie(config: &AuthConfig, token: String, max_age_secs: u64) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            i64::try_from(max_age_secs).unwrap_or(i64::MAX),
        ))
        .build()
}

/// Short-lived cookie carrying the PKCE verifier from login to callback.
pub fn verifier_cookie(config: &AuthConfig, verifier: String) -> Cookie<'static> {
    Cookie::build((config.verifier_cookie_name(), verifier))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(VERIFIER_TTL_MINUTES))
        .build()
}

/// Cookie that clears `name` when passed to `CookieJar::remove`.
pub fn removal_cookie(name: String) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}
