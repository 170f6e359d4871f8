use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to exchange authorization code: {0}")]
    CodeExchange(String),

    #[error("invalid session token: {0}")]
    InvalidToken(String),

    #[error("missing required claim: {0}")]
    MissingClaim(String),

    #[error("provider error: {0}")]
    Provider(String),
}
