use std::rc::Rc;

use super::*;
use crate::session::storage::MemoryStorage;

fn store_with_raw() -> (SessionStore, Rc<MemoryStorage>) {
    let raw = Rc::new(MemoryStorage::new());
    let store = SessionStore::new(raw.clone());
    (store, raw)
}

fn profile() -> UserProfile {
    UserProfile {
        id: "1".to_owned(),
        email: "a@b.com".to_owned(),
        full_name: Some("Alex".to_owned()),
        role: None,
        trainer: None,
    }
}

// =============================================================================
// save / get (P1)
// =============================================================================

#[test]
fn save_then_read_back() {
    let (store, _) = store_with_raw();
    store.save("abc", &profile());
    assert_eq!(store.token().as_deref(), Some("abc"));
    assert_eq!(store.profile(), Some(profile()));
    assert!(store.last_refresh().is_some());
}

#[test]
fn save_is_idempotent() {
    let (store, _) = store_with_raw();
    store.save("abc", &profile());
    store.save("abc", &profile());
    assert_eq!(store.token().as_deref(), Some("abc"));
    assert_eq!(store.profile(), Some(profile()));
}

#[test]
fn save_overwrites_previous_session() {
    let (store, _) = store_with_raw();
    store.save("old", &profile());
    let mut other = profile();
    other.email = "new@b.com".to_owned();
    store.save("new", &other);
    assert_eq!(store.token().as_deref(), Some("new"));
    assert_eq!(store.profile().unwrap().email, "new@b.com");
}

// =============================================================================
// clear (P2)
// =============================================================================

#[test]
fn clear_removes_everything() {
    let (store, _) = store_with_raw();
    store.save("abc", &profile());
    store.clear();
    assert!(store.token().is_none());
    assert!(store.profile().is_none());
    assert!(store.last_refresh().is_none());
    assert!(!store.is_logged_in());
}

#[test]
fn clear_on_empty_store_is_harmless() {
    let (store, _) = store_with_raw();
    store.clear();
    assert!(!store.is_logged_in());
}

// =============================================================================
// presence invariant (P3)
// =============================================================================

#[test]
fn logged_in_requires_both_token_and_profile() {
    let (store, raw) = store_with_raw();
    assert!(!store.is_logged_in());

    raw.set(AUTH_TOKEN_KEY, "abc");
    assert!(!store.is_logged_in());

    raw.remove(AUTH_TOKEN_KEY);
    raw.set(USER_DATA_KEY, r#"{"id":"1","email":"a@b.com"}"#);
    assert!(!store.is_logged_in());

    raw.set(AUTH_TOKEN_KEY, "abc");
    assert!(store.is_logged_in());
}

#[test]
fn malformed_profile_reads_as_absent() {
    let (store, raw) = store_with_raw();
    raw.set(AUTH_TOKEN_KEY, "abc");
    raw.set(USER_DATA_KEY, "{not json");
    assert!(store.profile().is_none());
    assert!(!store.is_logged_in());
}

// =============================================================================
// touch
// =============================================================================

#[test]
fn touch_bumps_timestamp_when_logged_in() {
    let (store, raw) = store_with_raw();
    store.save("abc", &profile());
    raw.set(SESSION_REFRESH_KEY, "1000");
    store.touch();
    assert!(store.last_refresh().unwrap() > 1000);
}

#[test]
fn touch_without_session_writes_nothing() {
    let (store, _) = store_with_raw();
    store.touch();
    assert!(store.last_refresh().is_none());
}

// =============================================================================
// expiry and staleness (P6 substrate)
// =============================================================================

#[test]
fn session_older_than_hard_timeout_is_expired() {
    let (store, raw) = store_with_raw();
    store.save("abc", &profile());
    let now = now_ms();
    raw.set(SESSION_REFRESH_KEY, &(now - SESSION_TIMEOUT_MS - 1).to_string());
    assert!(store.is_expired(now));
}

#[test]
fn fresh_session_is_not_expired() {
    let (store, _) = store_with_raw();
    store.save("abc", &profile());
    assert!(!store.is_expired(now_ms()));
}

#[test]
fn missing_timestamp_is_not_expired() {
    let (store, raw) = store_with_raw();
    store.save("abc", &profile());
    raw.remove(SESSION_REFRESH_KEY);
    assert!(!store.is_expired(now_ms()));
}

#[test]
fn unparseable_timestamp_reads_as_absent() {
    let (store, raw) = store_with_raw();
    raw.set(SESSION_REFRESH_KEY, "not-a-number");
    assert!(store.last_refresh().is_none());
}

#[test]
fn token_staleness_threshold() {
    let (store, raw) = store_with_raw();
    store.save("abc", &profile());
    let now = now_ms();

    raw.set(SESSION_REFRESH_KEY, &(now - TOKEN_STALE_MS - 1).to_string());
    assert!(store.is_token_stale(now));

    raw.set(SESSION_REFRESH_KEY, &(now - TOKEN_STALE_MS + 1000).to_string());
    assert!(!store.is_token_stale(now));
}

#[test]
fn stale_is_not_expired() {
    let (store, raw) = store_with_raw();
    store.save("abc", &profile());
    let now = now_ms();
    raw.set(SESSION_REFRESH_KEY, &(now - TOKEN_STALE_MS - 1).to_string());
    assert!(store.is_token_stale(now));
    assert!(!store.is_expired(now));
}
