use super::*;

// =============================================================================
// AuthState defaults
// =============================================================================

#[test]
fn default_has_no_user_or_token() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert!(state.token.is_none());
    assert!(state.error.is_none());
}

#[test]
fn default_starts_loading() {
    let state = AuthState::default();
    assert!(state.loading);
}

// =============================================================================
// is_authenticated
// =============================================================================

#[test]
fn not_authenticated_without_both_fields() {
    let mut state = AuthState::default();
    assert!(!state.is_authenticated());

    state.token = Some("abc".to_owned());
    assert!(!state.is_authenticated());

    state.token = None;
    state.user = Some(UserProfile {
        id: "1".to_owned(),
        email: "a@b.com".to_owned(),
        full_name: None,
        role: None,
        trainer: None,
    });
    assert!(!state.is_authenticated());
}

#[test]
fn authenticated_with_user_and_token() {
    let state = AuthState {
        user: Some(UserProfile {
            id: "1".to_owned(),
            email: "a@b.com".to_owned(),
            full_name: None,
            role: None,
            trainer: None,
        }),
        token: Some("abc".to_owned()),
        loading: false,
        error: None,
    };
    assert!(state.is_authenticated());
}
