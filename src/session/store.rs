//! Local Session Store: the durable source of truth for "is this trainer
//! logged in".
//!
//! DESIGN
//! ======
//! Three string entries — bearer token, JSON user profile, last-refresh
//! epoch millis. A session counts as present only when token AND profile
//! are both readable; anything partial or malformed reads as absent. The
//! store never touches the network or the identity provider.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::rc::Rc;

use log::{info, warn};

use crate::net::types::UserProfile;
use crate::session::storage::KeyValueStorage;
use crate::util::clock::now_ms;

pub const AUTH_TOKEN_KEY: &str = "tfc_trainer_auth_token";
pub const USER_DATA_KEY: &str = "tfc_trainer_user_data";
pub const SESSION_REFRESH_KEY: &str = "tfc_trainer_last_refresh";

/// Hard session timeout: 8 hours without a successful refresh.
pub const SESSION_TIMEOUT_MS: u64 = 8 * 60 * 60 * 1000;

/// Provider tokens expire after an hour; treat anything older than 55
/// minutes as stale and refresh it before use.
pub const TOKEN_STALE_MS: u64 = 55 * 60 * 1000;

/// Session persistence over a key/value backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Persist token + profile and stamp the refresh time. Total overwrite.
    pub fn save(&self, token: &str, profile: &UserProfile) {
        let Ok(json) = serde_json::to_string(profile) else {
            warn!("session: could not serialize user profile, not saving");
            return;
        };
        self.storage.set(AUTH_TOKEN_KEY, token);
        self.storage.set(USER_DATA_KEY, &json);
        self.storage.set(SESSION_REFRESH_KEY, &now_ms().to_string());
        info!("session: saved new session data");
    }

    /// Remove all session entries.
    pub fn clear(&self) {
        self.storage.remove(AUTH_TOKEN_KEY);
        self.storage.remove(USER_DATA_KEY);
        self.storage.remove(SESSION_REFRESH_KEY);
        info!("session: cleared all session data");
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY)
    }

    /// Persisted user profile. Malformed JSON reads as absent.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        let raw = self.storage.get(USER_DATA_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("session: error parsing stored user data: {err}");
                None
            }
        }
    }

    /// Last successful refresh as epoch millis, if recorded and parseable.
    #[must_use]
    pub fn last_refresh(&self) -> Option<u64> {
        self.storage
            .get(SESSION_REFRESH_KEY)
            .and_then(|raw| raw.parse().ok())
    }

    /// Both token and profile present.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some() && self.profile().is_some()
    }

    /// Bump the refresh timestamp, but only for a live session.
    pub fn touch(&self) {
        if self.is_logged_in() {
            self.storage.set(SESSION_REFRESH_KEY, &now_ms().to_string());
        }
    }

    /// Whether the hard 8-hour timeout has elapsed since the last refresh.
    /// A session with no recorded timestamp is not considered expired.
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        self.last_refresh()
            .is_some_and(|last| now.saturating_sub(last) > SESSION_TIMEOUT_MS)
    }

    /// Whether the stored provider token is old enough to refresh proactively.
    #[must_use]
    pub fn is_token_stale(&self, now: u64) -> bool {
        self.last_refresh()
            .is_some_and(|last| now.saturating_sub(last) > TOKEN_STALE_MS)
    }
}
