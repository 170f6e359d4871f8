use async_trait::async_trait;

use crate::users::{UserRecord, UserUpsert};

use super::Result;

/// The user directory: one row per user, keyed by email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Inserts the user, or updates the row that already has this email.
    ///
    /// On insert the role is [`UserRole::default`](crate::users::UserRole).
    /// On update `id` and `full_name` are overwritten and the stored role is
    /// kept. Returns the row as persisted.
    async fn upsert_user(&self, user: &UserUpsert) -> Result<UserRecord>;
}
