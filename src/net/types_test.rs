use super::*;

// =============================================================================
// UserProfile
// =============================================================================

#[test]
fn user_profile_minimal_json_deserializes() {
    let profile: UserProfile = serde_json::from_str(r#"{"id":"1","email":"a@b.com"}"#).unwrap();
    assert_eq!(profile.id, "1");
    assert_eq!(profile.email, "a@b.com");
    assert!(profile.full_name.is_none());
    assert!(profile.role.is_none());
    assert!(profile.trainer.is_none());
}

#[test]
fn user_profile_omits_absent_optionals_when_serialized() {
    let profile = UserProfile {
        id: "1".to_owned(),
        email: "a@b.com".to_owned(),
        full_name: None,
        role: None,
        trainer: None,
    };
    let json = serde_json::to_string(&profile).unwrap();
    assert!(!json.contains("full_name"));
    assert!(!json.contains("role"));
    assert!(!json.contains("trainer"));
}

#[test]
fn user_profile_round_trips_with_trainer_data() {
    let profile = UserProfile {
        id: "7".to_owned(),
        email: "t@gym.com".to_owned(),
        full_name: Some("Tess Trainer".to_owned()),
        role: Some("trainer".to_owned()),
        trainer: Some(TrainerProfile {
            bio: "Strength coach".to_owned(),
            certifications: vec!["NASM".to_owned()],
            experience_years: 6,
        }),
    };
    let json = serde_json::to_string(&profile).unwrap();
    let restored: UserProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, profile);
}

// =============================================================================
// ExchangeRequest
// =============================================================================

#[test]
fn exchange_request_skips_absent_password_and_name() {
    let req = ExchangeRequest {
        provider: "google.com".to_owned(),
        email: "a@b.com".to_owned(),
        full_name: None,
        password: None,
        credential: "cred".to_owned(),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("password"));
    assert!(!json.contains("full_name"));
    assert!(json.contains("\"provider\":\"google.com\""));
}

#[test]
fn exchange_response_parses_token_and_user() {
    let json = r#"{"token":"abc","user":{"id":"1","email":"a@b.com"}}"#;
    let resp: ExchangeResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.token, "abc");
    assert_eq!(resp.user.email, "a@b.com");
}

// =============================================================================
// TrainerProfile defaults
// =============================================================================

#[test]
fn trainer_profile_defaults_missing_fields() {
    let profile: TrainerProfile = serde_json::from_str("{}").unwrap();
    assert!(profile.bio.is_empty());
    assert!(profile.certifications.is_empty());
    assert_eq!(profile.experience_years, 0);
}
