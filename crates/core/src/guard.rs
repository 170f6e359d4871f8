//! Route guard decisions.
//!
//! The guard runs once per request before any page logic. Deciding where a
//! request goes is a pure function of the path and whether the caller has a
//! valid session; resolving the session is left to the shell.

use crate::auth::DASHBOARD_PATH;

pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// What the guard does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through untouched.
    Allow,
    /// Protected page without a session.
    RedirectToLogin,
    /// Login page with a session.
    RedirectToHome,
}

/// Which paths are protected and where redirects point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    pub protected_prefix: String,
    pub login_path: String,
    pub home_path: String,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            protected_prefix: DASHBOARD_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            home_path: DASHBOARD_PATH.to_string(),
        }
    }
}

impl GuardPolicy {
    pub fn is_protected(&self, path: &str) -> bool {
        matches_prefix(path, &self.protected_prefix)
    }

    pub fn is_login(&self, path: &str) -> bool {
        path == self.login_path
    }

    /// Whether the decision for `path` depends on the session at all.
    ///
    /// Lets the shell skip the provider round-trip for every other path.
    pub fn requires_session_check(&self, path: &str) -> bool {
        self.is_protected(path) || self.is_login(path)
    }

    pub fn decide(&self, path: &str, authenticated: bool) -> GuardDecision {
        if !authenticated && self.is_protected(path) {
            GuardDecision::RedirectToLogin
        } else if authenticated && self.is_login(path) {
            GuardDecision::RedirectToHome
        } else {
            GuardDecision::Allow
        }
    }

    /// Redirect location for a decision, `None` for [`GuardDecision::Allow`].
    pub fn redirect_target(&self, decision: GuardDecision) -> Option<&str> {
        match decision {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin => Some(&self.login_path),
            GuardDecision::RedirectToHome => Some(&self.home_path),
        }
    }
}

/// Segment-aware prefix match: `/dashboard` covers `/dashboard` and
/// `/dashboard/settings` but not `/dashboardx`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
