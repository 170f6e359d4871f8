//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use launchkit_core::auth::Identity;

use crate::AuthState;

/// Extractor for the authenticated identity. Returns 401 if not authenticated.
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let client = auth_state.client(&parts.headers);

        if client.token().is_none() {
            return Err((StatusCode::UNAUTHORIZED, "No session"));
        }

        match client.get_user().await {
            Ok(Some(identity)) => Ok(CurrentIdentity(identity)),
            Ok(None) => Err((StatusCode::UNAUTHORIZED, "Session not valid")),
            Err(e) => {
                tracing::warn!(error = %e, "Identity lookup failed");
                Err((StatusCode::UNAUTHORIZED, "Identity lookup failed"))
            }
        }
    }
}

/// Extractor for an optionally authenticated identity. Returns None if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let client = auth_state.client(&parts.headers);

        match client.get_user().await {
            Ok(identity) => Ok(OptionalIdentity(identity)),
            Err(e) => {
                tracing::warn!(error = %e, "Identity lookup failed, treating as anonymous");
                Ok(OptionalIdentity(None))
            }
        }
    }
}
