use serde::{Deserialize, Serialize};

use crate::auth::{derive_full_name, Identity};

/// Subscription state of a user. New users start out unsubscribed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Unsubscribed,
    Subscribed,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsubscribed => "unsubscribed",
            Self::Subscribed => "subscribed",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsubscribed" => Ok(Self::Unsubscribed),
            "subscribed" => Ok(Self::Subscribed),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A row in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

impl UserRecord {
    /// The row written the first time an email is seen.
    pub fn from_upsert(upsert: &UserUpsert) -> Self {
        Self {
            id: upsert.id.clone(),
            email: upsert.email.clone(),
            full_name: upsert.full_name.clone(),
            role: UserRole::default(),
        }
    }

    /// Overwrite the profile fields of an existing row. The role is kept.
    pub fn apply_upsert(&mut self, upsert: &UserUpsert) {
        self.id = upsert.id.clone();
        self.full_name = upsert.full_name.clone();
    }
}

/// A validated, authorized write to the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpsert {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

/// Body of `POST /api/users/sync`.
///
/// Every field is optional at the wire level so that a missing `id` or
/// `email` surfaces as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncUserRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl SyncUserRequest {
    /// Build the sync payload for an identity freshly returned by the provider.
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            id: Some(identity.id.clone()),
            email: identity.email.clone(),
            full_name: derive_full_name(&identity.user_metadata),
        }
    }
}

/// Success body of `POST /api/users/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncUserResponse {
    pub ok: bool,
    pub user: UserRecord,
}

impl SyncUserResponse {
    pub fn new(user: UserRecord) -> Self {
        Self { ok: true, user }
    }
}

/// JSON error body: `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
