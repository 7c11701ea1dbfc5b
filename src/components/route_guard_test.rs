use super::*;

use crate::net::types::UserProfile;

fn authenticated_state() -> AuthState {
    AuthState {
        user: Some(UserProfile {
            id: "u1".into(),
            email: "t@example.com".into(),
            full_name: None,
            role: None,
            trainer: None,
        }),
        token: Some("tok".into()),
        loading: false,
        error: None,
    }
}

fn settled_anonymous() -> AuthState {
    AuthState {
        loading: false,
        ..AuthState::default()
    }
}

// ============================================================================
// REDIRECT DECISION
// ============================================================================

#[test]
fn no_redirect_while_session_restore_is_loading() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(!should_redirect(&state, false));
}

#[test]
fn no_redirect_while_validation_is_in_flight() {
    assert!(!should_redirect(&settled_anonymous(), true));
}

#[test]
fn redirects_once_settled_and_unauthenticated() {
    assert!(should_redirect(&settled_anonymous(), false));
}

#[test]
fn never_redirects_an_authenticated_trainer() {
    assert!(!should_redirect(&authenticated_state(), false));
    assert!(!should_redirect(&authenticated_state(), true));
}

// ============================================================================
// REDIRECT TARGET
// ============================================================================

#[test]
fn redirect_carries_the_requested_path() {
    assert_eq!(
        redirect_target("/trainer/login", "/trainer"),
        "/trainer/login?from=/trainer"
    );
}

#[test]
fn redirect_from_root_omits_the_query() {
    assert_eq!(redirect_target("/trainer/login", "/"), "/trainer/login");
    assert_eq!(redirect_target("/trainer/login", ""), "/trainer/login");
}

#[test]
fn redirect_never_points_back_at_itself() {
    assert_eq!(
        redirect_target("/trainer/login", "/trainer/login"),
        "/trainer/login"
    );
}
