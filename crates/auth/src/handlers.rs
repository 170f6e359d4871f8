//! HTTP handlers for auth routes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use launchkit_core::auth::{Identity, DASHBOARD_PATH};
use launchkit_core::guard::DEFAULT_LOGIN_PATH;
use oauth2::PkceCodeChallenge;
use serde::Deserialize;

use crate::callback::{run_callback, CALLBACK_TIMEOUT};
use crate::config::CALLBACK_PATH;
use crate::cookies::{removal_cookie, session_cookie, verifier_cookie};
use crate::error::AuthError;
use crate::extractors::CurrentIdentity;
use crate::AuthState;

/// Query parameters for the OAuth callback.
#[derive(Deserialize, Default)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// Creates the auth router with all authentication routes.
///
/// Routes:
/// - `GET /auth/login` - Start the social login flow
/// - `GET /auth/callback` - Handle the provider's redirect back
/// - `POST /auth/logout` - End the current session
/// - `GET /auth/me` - Get the current identity
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/auth/login", get(login))
        .route(CALLBACK_PATH, get(callback))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let callback_url = state.config.callback_url()?;
    let auth_url = state.provider().authorization_url(
        state.config.oauth_provider,
        &callback_url,
        pkce_challenge.as_str(),
    )?;

    // The verifier rides along in a cookie; the callback hands it to the exchange
    let jar = jar.add(verifier_cookie(
        &state.config,
        pkce_verifier.secret().to_string(),
    ));

    Ok((jar, Redirect::to(auth_url.as_str())))
}

async fn callback(
    State(state): State<AuthState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let verifier_name = state.config.verifier_cookie_name();
    let code_verifier = jar.get(&verifier_name).map(|c| c.value().to_string());

    let mut client = state.client(&headers);
    let report = run_callback(
        &mut client,
        state.sync_client(),
        query.code.as_deref(),
        code_verifier.as_deref(),
        tokio::time::Instant::now() + CALLBACK_TIMEOUT,
    )
    .await;
    report.log();

    let mut jar = jar;
    if let Some(session) = report.session() {
        jar = jar.add(session_cookie(
            &state.config,
            session.access_token.clone(),
            session.expires_in,
        ));
    }
    if code_verifier.is_some() {
        jar = jar.remove(removal_cookie(verifier_name));
    }

    (jar, Redirect::temporary(DASHBOARD_PATH))
}

async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let client = state.client(&headers);
    if let Err(e) = client.sign_out().await {
        tracing::warn!(error = %e, "Provider sign-out failed, clearing cookie anyway");
    }

    let jar = jar.remove(removal_cookie(state.config.cookie_name.clone()));
    (jar, Redirect::to(DEFAULT_LOGIN_PATH))
}

async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<Identity> {
    Json(identity)
}
