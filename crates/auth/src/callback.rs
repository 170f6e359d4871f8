//! The OAuth callback flow: exchange, identity, sync.
//!
//! Each step yields an outcome value instead of an early return. The handler
//! logs the finished [`CallbackReport`] and redirects no matter what it says,
//! so a failing provider or directory never keeps a user off the dashboard.

use std::future::Future;
use std::time::Duration;

use launchkit_core::auth::{Identity, ProviderSession};
use tokio::time::Instant;
use launchkit_core::users::{SyncUserRequest, UserRecord};

use crate::client::AuthClient;
use crate::error::AuthError;
use crate::sync::UserSyncClient;

/// Time the whole callback may take. Stays under the router's request
/// timeout so a stalled provider still ends in the redirect.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(8);

/// Outcome of exchanging the authorization code.
#[derive(Debug)]
pub enum ExchangeOutcome {
    /// The request carried no code; nothing to exchange.
    NoCode,
    Exchanged(ProviderSession),
    Failed(AuthError),
}

/// Outcome of asking the provider who the new session belongs to.
#[derive(Debug)]
pub enum IdentityOutcome {
    /// No session to ask about.
    Skipped,
    Found(Identity),
    /// The provider did not recognise the fresh session.
    Missing,
    Failed(AuthError),
}

/// Outcome of pushing the identity into the user directory.
#[derive(Debug)]
pub enum SyncOutcome {
    /// No identity to sync.
    Skipped,
    Synced(UserRecord),
    Failed(AuthError),
}

/// Everything that happened during one callback.
#[derive(Debug)]
pub struct CallbackReport {
    pub exchange: ExchangeOutcome,
    pub identity: IdentityOutcome,
    pub sync: SyncOutcome,
}

impl CallbackReport {
    /// The session obtained by the exchange, if it succeeded.
    pub fn session(&self) -> Option<&ProviderSession> {
        match &self.exchange {
            ExchangeOutcome::Exchanged(session) => Some(session),
            _ => None,
        }
    }

    /// Log every step. Failures are logged here and nowhere else.
    pub fn log(&self) {
        match &self.exchange {
            ExchangeOutcome::NoCode => {
                tracing::debug!("No authorization code on callback, skipping exchange")
            }
            ExchangeOutcome::Exchanged(session) => {
                tracing::info!(user_id = %session.user.id, "Exchanged authorization code")
            }
            ExchangeOutcome::Failed(e) => {
                tracing::error!(error = %e, "Authorization code exchange failed")
            }
        }

        match &self.identity {
            IdentityOutcome::Skipped | IdentityOutcome::Found(_) => {}
            IdentityOutcome::Missing => {
                tracing::warn!("Provider returned no identity for the new session")
            }
            IdentityOutcome::Failed(e) => tracing::error!(error = %e, "Identity fetch failed"),
        }

        match &self.sync {
            SyncOutcome::Skipped => {}
            SyncOutcome::Synced(user) => {
                tracing::info!(user_id = %user.id, email = %user.email, "User synced")
            }
            SyncOutcome::Failed(e) => tracing::error!(error = %e, "User sync failed"),
        }
    }
}

/// Run the callback steps in order. Never fails; see [`CallbackReport`].
///
/// Every step shares `deadline`; a step still running when it passes fails
/// with [`AuthError::Timeout`] and the steps after it are skipped.
pub(crate) async fn run_callback(
    client: &mut AuthClient,
    sync: &dyn UserSyncClient,
    code: Option<&str>,
    code_verifier: Option<&str>,
    deadline: Instant,
) -> CallbackReport {
    let exchange = exchange_step(client, code, code_verifier, deadline).await;
    let identity = identity_step(client, &exchange, deadline).await;
    let sync = sync_step(client, sync, &identity, deadline).await;

    CallbackReport {
        exchange,
        identity,
        sync,
    }
}

async fn before<T>(
    deadline: Instant,
    step: &'static str,
    fut: impl Future<Output = Result<T, AuthError>>,
) -> Result<T, AuthError> {
    match tokio::time::timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(AuthError::Timeout(step)),
    }
}

async fn exchange_step(
    client: &mut AuthClient,
    code: Option<&str>,
    code_verifier: Option<&str>,
    deadline: Instant,
) -> ExchangeOutcome {
    let Some(code) = code.filter(|c| !c.is_empty()) else {
        return ExchangeOutcome::NoCode;
    };

    let exchange = client.exchange_code_for_session(code, code_verifier);
    match before(deadline, "code exchange", exchange).await {
        Ok(session) => ExchangeOutcome::Exchanged(session),
        Err(e) => ExchangeOutcome::Failed(e),
    }
}

async fn identity_step(
    client: &AuthClient,
    exchange: &ExchangeOutcome,
    deadline: Instant,
) -> IdentityOutcome {
    if !matches!(exchange, ExchangeOutcome::Exchanged(_)) {
        return IdentityOutcome::Skipped;
    }

    match before(deadline, "identity fetch", client.get_user()).await {
        Ok(Some(identity)) => IdentityOutcome::Found(identity),
        Ok(None) => IdentityOutcome::Missing,
        Err(e) => IdentityOutcome::Failed(e),
    }
}

async fn sync_step(
    client: &AuthClient,
    sync: &dyn UserSyncClient,
    identity: &IdentityOutcome,
    deadline: Instant,
) -> SyncOutcome {
    let (IdentityOutcome::Found(identity), Some(token)) = (identity, client.token()) else {
        return SyncOutcome::Skipped;
    };

    let request = SyncUserRequest::from_identity(identity);
    match before(deadline, "user sync", sync.sync_user(token, &request)).await {
        Ok(user) => SyncOutcome::Synced(user),
        Err(e) => SyncOutcome::Failed(e),
    }
}
