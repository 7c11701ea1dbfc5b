//! Identity provider contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hosted identity service authenticates end users and issues
//! short-lived bearer credentials. This module defines the capability
//! surface the session core consumes — the provider itself is an external
//! collaborator, reached through [`rest::RestIdentityProvider`] in the
//! browser and through in-test fakes everywhere else.

pub mod rest;

use std::rc::Rc;

use async_trait::async_trait;

/// Snapshot of the signed-in principal as the provider reports it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Identity {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Failures surfaced by the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("sign-in was cancelled")]
    UserCancelled,
    #[error("this email address is already in use")]
    EmailInUse,
    #[error("the password is too weak")]
    WeakPassword,
    #[error("the email address is not valid")]
    InvalidEmail,
    #[error("no signed-in identity")]
    NoIdentity,
    /// A full-page redirect to the hosted sign-in flow is in progress; the
    /// result arrives through session restore once the browser returns.
    #[error("redirecting to hosted sign-in")]
    Redirected,
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Callback invoked on every provider-visible sign-in/sign-out, including
/// those originating in other tabs. `None` means signed out.
pub type IdentityCallback = Rc<dyn Fn(Option<Identity>)>;

/// Handle for an identity-change subscription. Unsubscribes when dropped,
/// so the subscription's lifetime is owned by whoever holds the handle.
pub struct IdentitySubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl IdentitySubscription {
    #[must_use]
    pub fn new(cancel: Box<dyn FnOnce()>) -> Self {
        Self { cancel: Some(cancel) }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for IdentitySubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Capability surface of the external identity provider.
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Synchronous snapshot of the current identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError>;

    /// Interactive (federated) sign-in via the provider's own flow.
    async fn sign_in_interactive(&self) -> Result<Identity, ProviderError>;

    async fn create_identity(&self, email: &str, password: &str)
    -> Result<Identity, ProviderError>;

    async fn set_display_name(&self, name: &str) -> Result<(), ProviderError>;

    /// Mint a bearer credential for the current identity. `force_fresh`
    /// bypasses any cached credential in the provider.
    async fn mint_credential(&self, force_fresh: bool) -> Result<String, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Subscribe to sign-in/sign-out transitions. The returned handle owns
    /// the subscription.
    fn subscribe_identity_changes(&self, callback: IdentityCallback) -> IdentitySubscription;
}
