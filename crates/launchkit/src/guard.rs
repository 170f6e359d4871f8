//! Route guard middleware.
//!
//! Resolves whether the request carries a valid session, but only for paths
//! the policy cares about, and applies the [`GuardPolicy`] decision.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use launchkit_auth::AuthClient;
use launchkit_core::guard::{GuardDecision, GuardPolicy};

use crate::state::AppState;

pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !state.guard.requires_session_check(&path) {
        return next.run(request).await;
    }

    let authenticated = is_authenticated(state.auth.client(request.headers())).await;
    let decision = state.guard.decide(&path, authenticated);

    match redirect_for(&state.guard, decision) {
        Some(redirect) => {
            tracing::debug!(path = %path, ?decision, "Route guard redirect");
            redirect.into_response()
        }
        None => next.run(request).await,
    }
}

async fn is_authenticated(client: AuthClient) -> bool {
    if client.token().is_none() {
        return false;
    }

    match client.get_user().await {
        Ok(identity) => identity.is_some(),
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed, treating as signed out");
            false
        }
    }
}

fn redirect_for(policy: &GuardPolicy, decision: GuardDecision) -> Option<Redirect> {
    policy.redirect_target(decision).map(Redirect::temporary)
}
