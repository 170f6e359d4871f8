//! Application state.
//!
//! Shared across all request handlers. Holds the user directory as a trait
//! object, the auth state, and the route guard policy. Backends are chosen
//! via feature flags.

use std::sync::Arc;

use axum::extract::FromRef;
use launchkit_auth::AuthState;
use launchkit_core::guard::GuardPolicy;
use launchkit_core::storage::UserRepository;

use crate::config::Config;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "hosted"))]
compile_error!("Cannot enable both 'sqlite' and 'hosted' storage features");

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(all(feature = "hosted", feature = "inmemory"))]
compile_error!("Cannot enable both 'hosted' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite", feature = "hosted")))]
compile_error!("Must enable exactly one storage feature: 'inmemory', 'sqlite', or 'hosted'");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The user directory.
    pub users: Arc<dyn UserRepository>,
    /// Identity provider factory and auth configuration.
    pub auth: AuthState,
    /// Which paths the route guard protects.
    pub guard: GuardPolicy,
}

impl AppState {
    /// Assembles state from already-built parts.
    pub fn build(users: Arc<dyn UserRepository>, auth: AuthState, guard: GuardPolicy) -> Self {
        Self { users, auth, guard }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

// ============================================================================
// Factory functions for the different storage backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: &Config, auth: AuthState) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                auth,
                config.guard_policy(),
            ))
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage.
        pub async fn new(config: &Config, auth: AuthState) -> Result<Self, anyhow::Error> {
            let repo = SqliteRepository::new(&config.sqlite_path).await?;
            tracing::info!(path = %config.sqlite_path, "Opened SQLite user directory");

            Ok(Self::build(Arc::new(repo), auth, config.guard_policy()))
        }
    }
}

#[cfg(feature = "hosted")]
mod hosted {
    use super::*;
    use crate::storage::HostedRepository;

    impl AppState {
        /// Creates AppState backed by the hosted REST directory.
        pub async fn new(config: &Config, auth: AuthState) -> Result<Self, anyhow::Error> {
            let rest_url = config.directory_rest_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("DIRECTORY_REST_URL must be set with the 'hosted' feature")
            })?;
            let repo = HostedRepository::new(rest_url, config.directory_service_key.clone())?;

            Ok(Self::build(Arc::new(repo), auth, config.guard_policy()))
        }
    }
}
