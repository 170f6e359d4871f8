//! User sync endpoint.
//!
//! `POST /api/users/sync` writes the caller's own profile into the user
//! directory. The caller is identified from their session, never from the
//! body; the body only has to agree with it.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use launchkit_core::users::{
    authorize_sync, validate_sync_request, ErrorBody, SyncRejection, SyncUserRequest,
    SyncUserResponse,
};

use crate::state::AppState;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

fn rejection_response(rejection: SyncRejection) -> Response {
    let status =
        StatusCode::from_u16(rejection.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, rejection.message())
}

/// POST /api/users/sync
pub async fn sync_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SyncUserRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected malformed sync body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let upsert = match validate_sync_request(&request) {
        Ok(upsert) => upsert,
        Err(rejection) => return rejection_response(rejection),
    };

    let client = state.auth.client(&headers);
    let identity = match client.get_user().await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(error = %e, "Identity lookup failed during user sync");
            return rejection_response(SyncRejection::IdentityLookupFailed);
        }
    };

    if let Err(rejection) = authorize_sync(identity.as_ref(), &upsert) {
        tracing::warn!(
            claimed_id = %upsert.id,
            session_id = identity.as_ref().map(|i| i.id.as_str()).unwrap_or("<none>"),
            "Rejected user sync"
        );
        return rejection_response(rejection);
    }

    match state.users.upsert_user(&upsert).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "Upserted user");
            (StatusCode::OK, Json(SyncUserResponse::new(user))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, email = %upsert.email, "User upsert failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
