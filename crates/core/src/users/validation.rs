//! Validation and authorization of user sync requests.

use crate::auth::Identity;

use super::{SyncUserRequest, UserUpsert};

/// Why a sync request was turned away before touching the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRejection {
    /// `id` or `email` absent or empty.
    MissingFields,
    /// No session, or the session belongs to someone else.
    Unauthorized,
    /// The identity provider could not tell us who the caller is.
    IdentityLookupFailed,
}

impl SyncRejection {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingFields => 400,
            Self::Unauthorized | Self::IdentityLookupFailed => 401,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Missing id or email",
            Self::Unauthorized => "Unauthorized",
            Self::IdentityLookupFailed => "Auth getUser failed",
        }
    }
}

impl std::fmt::Display for SyncRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Checks that the request carries both `id` and `email`.
pub fn validate_sync_request(request: &SyncUserRequest) -> Result<UserUpsert, SyncRejection> {
    let (Some(id), Some(email)) = (non_empty(&request.id), non_empty(&request.email)) else {
        return Err(SyncRejection::MissingFields);
    };

    Ok(UserUpsert {
        id: id.to_string(),
        email: email.to_string(),
        full_name: request.full_name.clone(),
    })
}

/// A caller may only write their own record.
///
/// The directory is keyed by email, so both the id and the email in the body
/// must belong to the session. A session without an email can write nothing.
pub fn authorize_sync(session: Option<&Identity>, upsert: &UserUpsert) -> Result<(), SyncRejection> {
    match session {
        Some(identity)
            if identity.id == upsert.id && identity.email.as_deref() == Some(&upsert.email) =>
        {
            Ok(())
        }
        _ => Err(SyncRejection::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: Option<&str>, email: Option<&str>) -> SyncUserRequest {
        SyncUserRequest {
            id: id.map(String::from),
            email: email.map(String::from),
            full_name: None,
        }
    }

    #[test]
    fn accepts_id_and_email() {
        let upsert = validate_sync_request(&request(Some("u1"), Some("a@x.com"))).unwrap();
        assert_eq!(upsert.id, "u1");
        assert_eq!(upsert.email, "a@x.com");
        assert_eq!(upsert.full_name, None);
    }

    #[test]
    fn rejects_missing_id() {
        assert_eq!(
            validate_sync_request(&request(None, Some("a@x.com"))),
            Err(SyncRejection::MissingFields)
        );
    }

    #[test]
    fn rejects_missing_email() {
        assert_eq!(
            validate_sync_request(&request(Some("u1"), None)),
            Err(SyncRejection::MissingFields)
        );
    }

    #[test]
    fn rejects_empty_strings() {
        assert_eq!(
            validate_sync_request(&request(Some(""), Some("a@x.com"))),
            Err(SyncRejection::MissingFields)
        );
        assert_eq!(
            validate_sync_request(&request(Some("u1"), Some(""))),
            Err(SyncRejection::MissingFields)
        );
    }

    #[test]
    fn authorizes_matching_session() {
        let upsert = validate_sync_request(&request(Some("u1"), Some("a@x.com"))).unwrap();
        let identity = Identity::new("u1", "a@x.com");
        assert_eq!(authorize_sync(Some(&identity), &upsert), Ok(()));
    }

    #[test]
    fn rejects_other_users_session() {
        let upsert = validate_sync_request(&request(Some("u1"), Some("a@x.com"))).unwrap();
        let identity = Identity::new("u2", "b@x.com");
        assert_eq!(
            authorize_sync(Some(&identity), &upsert),
            Err(SyncRejection::Unauthorized)
        );
    }

    #[test]
    fn rejects_someone_elses_email() {
        let upsert = validate_sync_request(&request(Some("u2"), Some("a@x.com"))).unwrap();
        let identity = Identity::new("u2", "b@x.com");
        assert_eq!(
            authorize_sync(Some(&identity), &upsert),
            Err(SyncRejection::Unauthorized)
        );
    }

    #[test]
    fn rejects_session_without_email() {
        let upsert = validate_sync_request(&request(Some("u1"), Some("a@x.com"))).unwrap();
        let identity = Identity {
            email: None,
            ..Identity::new("u1", "a@x.com")
        };
        assert_eq!(
            authorize_sync(Some(&identity), &upsert),
            Err(SyncRejection::Unauthorized)
        );
    }

    #[test]
    fn rejects_missing_session() {
        let upsert = validate_sync_request(&request(Some("u1"), Some("a@x.com"))).unwrap();
        assert_eq!(authorize_sync(None, &upsert), Err(SyncRejection::Unauthorized));
    }

    #[test]
    fn rejection_status_and_message() {
        assert_eq!(SyncRejection::MissingFields.status_code(), 400);
        assert_eq!(SyncRejection::Unauthorized.status_code(), 401);
        assert_eq!(SyncRejection::IdentityLookupFailed.status_code(), 401);
        assert_eq!(
            SyncRejection::IdentityLookupFailed.to_string(),
            "Auth getUser failed"
        );
    }
}
