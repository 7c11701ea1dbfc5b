//! Route-level pages. The marketing pages are static content; the trainer
//! pages are where the session lifecycle is exercised.

pub mod home;
pub mod packages;
pub mod trainer_auth;
pub mod trainer_home;
pub mod under_development;
