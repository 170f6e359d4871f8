//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use launchkit_core::storage::{Result, UserRepository};
use launchkit_core::users::{UserRecord, UserUpsert};

/// In-memory user directory keyed by email.
///
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn upsert_user(&self, user: &UserUpsert) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        let record = users
            .entry(user.email.clone())
            .and_modify(|existing| existing.apply_upsert(user))
            .or_insert_with(|| UserRecord::from_upsert(user));
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchkit_core::users::UserRole;

    fn upsert(id: &str, full_name: Option<&str>) -> UserUpsert {
        UserUpsert {
            id: id.to_string(),
            email: "a@x.com".to_string(),
            full_name: full_name.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_unsubscribed() {
        let repo = InMemoryRepository::new();

        let user = repo.upsert_user(&upsert("u1", Some("Jane"))).await.unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.full_name.as_deref(), Some("Jane"));
        assert_eq!(user.role, UserRole::Unsubscribed);
        assert_eq!(repo.get_user_by_email("a@x.com").await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = InMemoryRepository::new();

        let first = repo.upsert_user(&upsert("u1", Some("Jane"))).await.unwrap();
        let second = repo.upsert_user(&upsert("u1", Some("Jane"))).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.users.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_profile_and_keeps_role() {
        let repo = InMemoryRepository::new();
        repo.upsert_user(&upsert("u1", Some("Jane"))).await.unwrap();
        repo.users
            .write()
            .await
            .get_mut("a@x.com")
            .unwrap()
            .role = UserRole::Subscribed;

        let user = repo.upsert_user(&upsert("u9", None)).await.unwrap();

        assert_eq!(user.id, "u9");
        assert_eq!(user.full_name, None);
        assert_eq!(user.role, UserRole::Subscribed);
    }

    #[tokio::test]
    async fn test_get_unknown_email() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_user_by_email("nobody@x.com").await.unwrap(), None);
    }
}
