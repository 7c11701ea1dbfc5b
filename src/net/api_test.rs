use futures::executor::block_on;

use super::*;

// =============================================================================
// error taxonomy
// =============================================================================

#[test]
fn timeout_is_distinct_from_unauthorized() {
    let timeout = ApiError::Timeout;
    let unauthorized = ApiError::Unauthorized;
    assert_ne!(timeout.to_string(), unauthorized.to_string());
}

#[test]
fn bad_request_carries_detail() {
    let err = ApiError::BadRequest("missing email".to_owned());
    assert!(err.to_string().contains("missing email"));
}

// =============================================================================
// native stubs
// =============================================================================

#[test]
fn exchange_off_browser_is_a_network_error() {
    let api = HttpExchangeApi::new("https://api.example.com");
    let request = ExchangeRequest {
        provider: "password".to_owned(),
        email: "a@b.com".to_owned(),
        full_name: None,
        password: Some("pw".to_owned()),
        credential: "cred".to_owned(),
    };
    let err = block_on(api.exchange(&request)).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[test]
fn register_trainer_off_browser_is_a_network_error() {
    let api = HttpExchangeApi::new("https://api.example.com");
    let request = TrainerProfileRequest {
        bio: "coach".to_owned(),
        certifications: vec![],
        experience_years: 3,
    };
    let err = block_on(api.register_trainer("token", &request)).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
