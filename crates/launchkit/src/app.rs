use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use launchkit_auth::auth_routes;
use launchkit_core::auth::DASHBOARD_PATH;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    guard::route_guard,
    handlers::{
        health::livez,
        pages::{dashboard, login_page},
        users::sync_user,
    },
    state::AppState,
};

/// Per-request budget. The auth callback finishes within `CALLBACK_TIMEOUT`,
/// which must stay below this.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/users/sync", post(sync_user))
        .layer(cors);

    // Guard layer covers every route registered above it
    Router::new()
        .route("/livez", get(livez))
        .route(&state.guard.login_path, get(login_page))
        .route(DASHBOARD_PATH, get(dashboard))
        .nest("/api", api_routes)
        .merge(auth_routes().with_state(state.auth.clone()))
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .with_state(state)
}
