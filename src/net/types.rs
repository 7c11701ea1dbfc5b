//! Wire types shared between the session core and the backend API.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Application user as persisted in the local session and returned by the
/// backend exchange. Only `id` and `email` are guaranteed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Extended trainer profile, present once registration completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<TrainerProfile>,
}

/// Extended trainer profile data registered after basic sign-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerProfile {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
}

/// Body of the credential-for-session exchange call.
#[derive(Clone, Debug, Serialize)]
pub struct ExchangeRequest {
    /// Provider of record: `"password"` or `"google.com"`.
    pub provider: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Freshly minted provider credential.
    pub credential: String,
}

/// Successful exchange: application session token plus the user it names.
#[derive(Clone, Debug, Deserialize)]
pub struct ExchangeResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Body of the extended trainer-profile registration call.
#[derive(Clone, Debug, Serialize)]
pub struct TrainerProfileRequest {
    pub bio: String,
    pub certifications: Vec<String>,
    pub experience_years: u32,
}

/// Response to trainer-profile registration.
#[derive(Clone, Debug, Deserialize)]
pub struct TrainerProfileResponse {
    pub profile: TrainerProfile,
}
