mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{derive_full_name, parse_bearer_token};
pub use traits::{IdentityProvider, Result};
pub use types::{Identity, OAuthProvider, ProviderSession, SessionToken};

/// Where a user lands after the OAuth callback, and where the guard sends
/// authenticated visitors of the login page.
pub const DASHBOARD_PATH: &str = "/dashboard";
