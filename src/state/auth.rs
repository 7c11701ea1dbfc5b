//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reactive mirror of the session lifecycle controller: the durable truth
//! lives in the session store, this snapshot drives route guards and
//! identity-dependent rendering.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::UserProfile;

/// Authentication state tracking the current user, token, and loading
/// status, plus the last user-facing error from an auth operation.
#[derive(Clone, Debug)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        // Starts loading: session restore runs before the first settled state.
        Self { user: None, token: None, loading: true, error: None }
    }
}

impl AuthState {
    /// Authenticated only when both user and token are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}
