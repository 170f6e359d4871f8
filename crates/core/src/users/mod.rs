mod types;
mod validation;

pub use types::{ErrorBody, SyncUserRequest, SyncUserResponse, UserRecord, UserRole, UserUpsert};
pub use validation::{authorize_sync, validate_sync_request, SyncRejection};
