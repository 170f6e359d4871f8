use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Auth errors for the launchkit_auth crate.
///
/// This wraps the core `AuthError` and adds crate-specific error variants
/// for I/O operations that can't be in the functional core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error reported by the identity provider seam.
    #[error(transparent)]
    Core(#[from] launchkit_core::auth::AuthError),

    /// HTTP error talking to one of our own endpoints.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A call did not finish in time.
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use launchkit_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidToken(_) | CoreError::MissingClaim(_) => {
                    (StatusCode::UNAUTHORIZED, self.to_string())
                }
                CoreError::CodeExchange(_) | CoreError::Provider(_) => {
                    tracing::error!("Auth error: {}", self);
                    (
                        StatusCode::BAD_GATEWAY,
                        "Authentication provider error".to_string(),
                    )
                }
            },
            AuthError::Http(_) => {
                tracing::error!("HTTP error during auth: {}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "Authentication provider error".to_string(),
                )
            }
            AuthError::Timeout(_) => {
                tracing::error!("Timeout during auth: {}", self);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "Authentication provider timed out".to_string(),
                )
            }
            AuthError::Config(_) => {
                tracing::error!("Config error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
