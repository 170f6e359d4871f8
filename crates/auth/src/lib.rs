//! Authentication for launchkit.
//!
//! This crate provides:
//! - Identity provider clients (hosted REST provider, mock provider for development)
//! - A request-scoped auth client built from the request's cookies
//! - The OAuth callback flow with best-effort user sync
//! - Axum extractors for authentication

mod callback;
mod client;
mod config;
mod cookies;
mod error;
mod extractors;
mod handlers;
mod providers;
mod state;
mod sync;

pub use callback::{
    CallbackReport, ExchangeOutcome, IdentityOutcome, SyncOutcome, CALLBACK_TIMEOUT,
};
pub use client::AuthClient;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{CurrentIdentity, OptionalIdentity};
pub use handlers::auth_routes;
#[cfg(feature = "mock")]
pub use providers::MockProvider;
pub use providers::HostedProvider;
pub use state::AuthState;
pub use sync::{HttpUserSyncClient, UserSyncClient};

#[cfg(feature = "mock")]
pub mod mock_idp;
