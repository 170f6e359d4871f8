use std::env;

use launchkit_core::auth::DASHBOARD_PATH;
use launchkit_core::guard::{GuardPolicy, DEFAULT_LOGIN_PATH};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "launchkit.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Base URL of the hosted directory's REST API.
    /// Note: Only used when the `hosted` feature is enabled.
    #[allow(dead_code)]
    pub directory_rest_url: Option<String>,
    /// Service key for the hosted directory.
    #[allow(dead_code)]
    pub directory_service_key: String,
    /// Path prefix that requires a session (default: "/dashboard")
    pub protected_prefix: String,
    /// Where signed-out visitors are sent (default: "/login")
    pub login_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "launchkit.db")
    /// - `DIRECTORY_REST_URL` - Hosted directory REST URL (required with `hosted`)
    /// - `DIRECTORY_SERVICE_KEY` - Hosted directory service key (default: empty)
    /// - `PROTECTED_PREFIX` - Guarded path prefix (default: "/dashboard")
    /// - `LOGIN_PATH` - Login page path (default: "/login")
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "launchkit.db".to_string()),
            directory_rest_url: env::var("DIRECTORY_REST_URL").ok(),
            directory_service_key: env::var("DIRECTORY_SERVICE_KEY").unwrap_or_default(),
            protected_prefix: env::var("PROTECTED_PREFIX")
                .unwrap_or_else(|_| DASHBOARD_PATH.to_string()),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string()),
        }
    }

    /// Route guard policy for the configured paths.
    pub fn guard_policy(&self) -> GuardPolicy {
        GuardPolicy {
            protected_prefix: self.protected_prefix.clone(),
            login_path: self.login_path.clone(),
            ..GuardPolicy::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_policy_uses_configured_paths() {
        let config = Config {
            sqlite_path: "test.db".to_string(),
            directory_rest_url: None,
            directory_service_key: String::new(),
            protected_prefix: "/app".to_string(),
            login_path: "/signin".to_string(),
        };

        let policy = config.guard_policy();

        assert_eq!(policy.protected_prefix, "/app");
        assert_eq!(policy.login_path, "/signin");
        assert_eq!(policy.home_path, "/dashboard");
    }

    #[test]
    fn test_default_values() {
        env::remove_var("SQLITE_PATH");
        env::remove_var("DIRECTORY_REST_URL");
        env::remove_var("PROTECTED_PREFIX");
        env::remove_var("LOGIN_PATH");

        let config = Config::from_env();

        assert_eq!(config.sqlite_path, "launchkit.db");
        assert_eq!(config.directory_rest_url, None);
        assert_eq!(config.protected_prefix, "/dashboard");
        assert_eq!(config.login_path, "/login");
    }
}
