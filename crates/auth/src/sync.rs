//! Client side of the user sync endpoint.

use async_trait::async_trait;
use launchkit_core::auth::SessionToken;
use launchkit_core::users::{ErrorBody, SyncUserRequest, SyncUserResponse, UserRecord};
use url::Url;

use crate::error::AuthError;

/// Pushes an identity into the user directory through the sync endpoint.
#[async_trait]
pub trait UserSyncClient: Send + Sync {
    /// Sync `request` on behalf of the session behind `token`.
    async fn sync_user(
        &self,
        token: &SessionToken,
        request: &SyncUserRequest,
    ) -> Result<UserRecord, AuthError>;
}

/// Server-to-server call to `POST /api/users/sync`.
///
/// The caller's own access token goes along as a bearer token; the endpoint
/// re-derives the identity from it rather than trusting the body.
pub struct HttpUserSyncClient {
    http_client: reqwest::Client,
    sync_url: Url,
}

impl HttpUserSyncClient {
    pub fn new(sync_url: Url) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            sync_url,
        }
    }
}

#[async_trait]
impl UserSyncClient for HttpUserSyncClient {
    async fn sync_user(
        &self,
        token: &SessionToken,
        request: &SyncUserRequest,
    ) -> Result<UserRecord, AuthError> {
        let response = self
            .http_client
            .post(self.sync_url.clone())
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => "no error body".to_string(),
            };
            return Err(AuthError::Http(format!(
                "user sync returned {status}: {detail}"
            )));
        }

        response
            .json::<SyncUserResponse>()
            .await
            .map(|body| body.user)
            .map_err(|e| AuthError::Http(e.to_string()))
    }
}
