//! Session lifecycle controller.
//!
//! ARCHITECTURE
//! ============
//! Coordinates three parties: the Local Session Store (durable truth), the
//! identity provider (authority for "is there still a signed-in
//! principal"), and the backend exchange (trades a provider credential for
//! an application session). The controller owns the in-memory auth mirror,
//! the identity-change subscription, and the route-validation retry
//! counter, so none of that state resets when a view remounts.
//!
//! TRADE-OFFS
//! ==========
//! Reconciliation handlers (restore, change events, timers, navigation,
//! guard validation) are not mutually exclusive; store writes are whole-key
//! overwrites, so interleavings resolve to last-writer-wins.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{error, info, warn};

use crate::identity::{Identity, IdentityProvider, IdentitySubscription, ProviderError};
use crate::net::api::ExchangeApi;
use crate::net::types::{ExchangeRequest, ExchangeResponse, TrainerProfileRequest, UserProfile};
use crate::session::store::SessionStore;
use crate::state::auth::AuthState;
use crate::util::clock::now_ms;

/// Bounded recovery attempts during route validation.
pub const MAX_VALIDATION_RETRIES: u32 = 2;

/// Outcome of a route-guard validation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteValidation {
    /// Session confirmed; render protected content.
    Authenticated,
    /// No usable session; redirect to sign-in.
    Denied,
    /// Validation failed after exhausting recovery; the fatal signal has
    /// fired and in-memory state should be considered unreliable.
    Fatal,
}

/// Orchestrates the client-side session lifecycle.
pub struct SessionController {
    provider: Rc<dyn IdentityProvider>,
    api: Rc<dyn ExchangeApi>,
    store: SessionStore,
    state: RefCell<AuthState>,
    retries: Cell<u32>,
    on_change: RefCell<Option<Rc<dyn Fn(AuthState)>>>,
    on_fatal: RefCell<Option<Rc<dyn Fn()>>>,
    subscription: RefCell<Option<IdentitySubscription>>,
}

impl SessionController {
    #[must_use]
    pub fn new(
        provider: Rc<dyn IdentityProvider>,
        api: Rc<dyn ExchangeApi>,
        store: SessionStore,
    ) -> Rc<Self> {
        Rc::new(Self {
            provider,
            api,
            store,
            state: RefCell::new(AuthState::default()),
            retries: Cell::new(0),
            on_change: RefCell::new(None),
            on_fatal: RefCell::new(None),
            subscription: RefCell::new(None),
        })
    }

    /// Current in-memory auth snapshot.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Observer for every auth-state change (the app mirrors this into a
    /// reactive signal).
    pub fn set_on_change(&self, callback: impl Fn(AuthState) + 'static) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    /// Observer for the fatal-session signal. The browser build wires this
    /// to a full page reload; tests observe it directly.
    pub fn set_on_fatal(&self, callback: impl Fn() + 'static) {
        *self.on_fatal.borrow_mut() = Some(Rc::new(callback));
    }

    /// Install the identity-change subscription. Held by the controller for
    /// its whole lifetime; torn down by [`Self::shutdown`] or drop.
    pub fn start(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let subscription = self.provider.subscribe_identity_changes(Rc::new(move |identity| {
            if let Some(controller) = weak.upgrade() {
                spawn_reconcile(async move {
                    controller.handle_identity_change(identity).await;
                });
            }
        }));
        *self.subscription.borrow_mut() = Some(subscription);
    }

    /// Tear down the identity-change subscription.
    pub fn shutdown(&self) {
        self.subscription.borrow_mut().take();
    }

    // -------------------------------------------------------------------
    // Startup restoration and reconciliation
    // -------------------------------------------------------------------

    /// Restore a session on startup: adopt a stored session the provider
    /// still vouches for, or recover a backend session when the provider is
    /// signed in but local state is gone.
    pub async fn restore_session(&self) {
        self.update_state(|s| s.loading = true);

        if self.try_restore_session().await {
            if let (Some(token), Some(profile)) = (self.store.token(), self.store.profile()) {
                info!("auth: restored session for {}", profile.email);
                self.update_state(|s| {
                    s.token = Some(token);
                    s.user = Some(profile);
                    s.error = None;
                });
            }
        } else if let Some(identity) = self.provider.current_identity() {
            // Provider is signed in but we hold no session: recover by
            // exchanging a fresh credential. One attempt, no retry.
            info!("auth: provider identity without local session, attempting recovery");
            match self.recover_from_identity(&identity).await {
                Ok(()) => info!("auth: recovered session"),
                Err(err) => warn!("auth: failed to recover session: {err}"),
            }
        }

        self.update_state(|s| s.loading = false);
    }

    /// Re-adopt the stored session if the provider still reports an
    /// identity, refreshing the credential along the way. Clears the store
    /// when the provider disagrees.
    pub async fn try_restore_session(&self) -> bool {
        if !self.store.is_logged_in() {
            return false;
        }

        if self.provider.current_identity().is_none() {
            info!("session: found local session but no provider identity, clearing");
            self.store.clear();
            return false;
        }

        match self.provider.mint_credential(true).await {
            Ok(token) => match self.store.profile() {
                Some(profile) => {
                    self.store.save(&token, &profile);
                    true
                }
                None => false,
            },
            Err(err) => {
                warn!("session: could not refresh credential while restoring: {err}");
                false
            }
        }
    }

    /// React to a provider-side sign-in/sign-out. The provider is the
    /// authority: no identity means the local session goes too.
    pub async fn handle_identity_change(&self, identity: Option<Identity>) {
        match identity {
            None => {
                if self.store.is_logged_in() || self.snapshot().is_authenticated() {
                    info!("auth: provider reports no identity, clearing local session");
                    self.store.clear();
                    self.set_unauthenticated();
                }
            }
            Some(_) => {
                if !self.snapshot().is_authenticated() {
                    info!("auth: provider has an identity while we are signed out, restoring");
                    self.restore_session().await;
                }
            }
        }
    }

    // -------------------------------------------------------------------
    // Validation and refresh
    // -------------------------------------------------------------------

    /// Check session validity: presence, hard timeout, token staleness
    /// (with a proactive refresh attempt), and provider agreement. Bumps
    /// the refresh timestamp and resets the retry counter on success.
    pub async fn is_session_valid(&self) -> bool {
        if !self.store.is_logged_in() {
            info!("session: no valid session data found");
            return false;
        }

        let now = now_ms();
        if self.store.is_expired(now) {
            info!("session: expired due to timeout");
            self.store.clear();
            self.set_unauthenticated();
            return false;
        }

        if self.store.is_token_stale(now) {
            info!("session: token might be expiring soon, attempting refresh");
            if self.refresh_provider_token().await.is_none() {
                info!("session: could not refresh token, continuing with existing token");
            }
        }

        if self.provider.current_identity().is_none() {
            info!("session: provider has no current identity, session invalid");
            return false;
        }

        self.store.touch();
        self.retries.set(0);
        true
    }

    /// Force-mint a fresh provider credential and persist it alongside the
    /// existing profile. `None` when there is no identity or minting fails.
    pub async fn refresh_provider_token(&self) -> Option<String> {
        if self.provider.current_identity().is_none() {
            info!("session: no provider identity for token refresh");
            return None;
        }
        match self.provider.mint_credential(true).await {
            Ok(token) => {
                if let Some(profile) = self.store.profile() {
                    self.store.save(&token, &profile);
                    let adopted = token.clone();
                    self.update_state(|s| s.token = Some(adopted));
                }
                Some(token)
            }
            Err(err) => {
                error!("session: error refreshing provider token: {err}");
                None
            }
        }
    }

    /// Force-mint and persist only when the credential actually changed.
    /// Returns the new token, or `None` on no-change or failure.
    async fn refresh_token_if_changed(&self) -> Option<String> {
        let current = self.store.token()?;
        if self.provider.current_identity().is_none() {
            return None;
        }
        match self.provider.mint_credential(true).await {
            Ok(token) if token != current => {
                if let Some(profile) = self.store.profile() {
                    self.store.save(&token, &profile);
                    let adopted = token.clone();
                    self.update_state(|s| s.token = Some(adopted));
                }
                Some(token)
            }
            Ok(_) => None,
            Err(err) => {
                error!("session: error refreshing token: {err}");
                None
            }
        }
    }

    /// Periodic background check (10-minute interval): provider-agreement
    /// safety net (irrecoverable disagreement is fatal), then timestamp
    /// bump and background credential refresh.
    pub async fn periodic_check(&self) {
        info!("session: running periodic session check");

        if self.provider.current_identity().is_none() && self.store.is_logged_in() {
            warn!("session: provider identity missing while a session exists");
            if !self.try_restore_session().await {
                self.fatal_session_error();
                return;
            }
        }

        if self.store.is_logged_in() {
            self.store.touch();
            if self.refresh_token_if_changed().await.is_some() {
                info!("session: refreshed token in background");
            }
        }
    }

    /// Lightweight refresh fired on every in-app navigation.
    pub async fn navigation_refresh(&self) {
        if !self.store.is_logged_in() {
            return;
        }
        self.store.touch();
        if self.refresh_token_if_changed().await.is_some() {
            info!("session: preemptively refreshed token on navigation");
        }
    }

    /// Route-guard validation with bounded recovery. After
    /// [`MAX_VALIDATION_RETRIES`] failed recovery attempts, the fatal
    /// signal fires and the result is [`RouteValidation::Fatal`].
    pub async fn validate_for_route(&self) -> RouteValidation {
        // The provider is authoritative even when the mirror thinks we are
        // signed in.
        if self.provider.current_identity().is_none() && self.store.is_logged_in() {
            info!("guard: session exists but no provider identity, clearing");
            self.store.clear();
            self.set_unauthenticated();
            return RouteValidation::Denied;
        }

        if !self.snapshot().is_authenticated() {
            return RouteValidation::Denied;
        }

        loop {
            if self.is_session_valid().await {
                self.store.touch();
                return RouteValidation::Authenticated;
            }

            let attempt = self.retries.get();
            if attempt >= MAX_VALIDATION_RETRIES {
                warn!("guard: recovery exhausted after {attempt} attempts");
                self.retries.set(0);
                self.fatal_session_error();
                return RouteValidation::Fatal;
            }

            self.retries.set(attempt + 1);
            info!("guard: attempting recovery (attempt {})", attempt + 1);
            let _ = self.refresh_provider_token().await;
        }
    }

    /// Single fatal-session path: clear everything and fire the injected
    /// signal (a full page reload in the browser).
    pub fn fatal_session_error(&self) {
        error!("session: fatal validation failure, clearing session");
        self.store.clear();
        self.set_unauthenticated();
        if let Some(callback) = self.on_fatal.borrow().clone() {
            callback();
        }
    }

    // -------------------------------------------------------------------
    // Login, registration, logout
    // -------------------------------------------------------------------

    /// Email/password login: provider sign-in, credential mint, backend
    /// exchange. Error messages name the step that failed.
    pub async fn login_with_credentials(&self, email: &str, password: &str) -> bool {
        self.begin_operation();

        let identity = match self.provider.sign_in_with_password(email, password).await {
            Ok(identity) => identity,
            Err(err) => return self.fail_operation(format!("Login failed: {err}")),
        };

        let credential = match self.provider.mint_credential(false).await {
            Ok(credential) => credential,
            Err(err) => return self.fail_operation(format!("Login failed: {err}")),
        };

        info!("auth: provider sign-in succeeded for {}, exchanging with backend", identity.uid);
        let request = ExchangeRequest {
            provider: "password".to_owned(),
            email: email.to_owned(),
            full_name: None,
            password: Some(password.to_owned()),
            credential,
        };
        match self.api.exchange(&request).await {
            Ok(response) => self.adopt_exchange(response, None),
            Err(err) => self.fail_operation(format!("Server sign-in failed: {err}")),
        }
    }

    /// Federated login through the provider's interactive flow.
    pub async fn login_with_provider(&self) -> bool {
        self.begin_operation();

        let identity = match self.provider.sign_in_interactive().await {
            Ok(identity) => identity,
            Err(ProviderError::Redirected) => {
                // The page is unloading into the hosted flow; not an error.
                self.update_state(|s| s.loading = false);
                return false;
            }
            Err(err) => return self.fail_operation(format!("Sign-in failed: {err}")),
        };

        let credential = match self.provider.mint_credential(false).await {
            Ok(credential) => credential,
            Err(err) => return self.fail_operation(format!("Sign-in failed: {err}")),
        };

        let request = ExchangeRequest {
            provider: "google.com".to_owned(),
            email: identity.email.clone().unwrap_or_default(),
            full_name: identity.display_name.clone(),
            password: None,
            credential,
        };
        match self.api.exchange(&request).await {
            Ok(response) => self.adopt_exchange(response, None),
            Err(err) => self.fail_operation(format!("Server sign-in failed: {err}")),
        }
    }

    /// Create a provider identity, set its display name, then exchange for
    /// a backend session. Nothing is persisted unless every step succeeds.
    pub async fn register_with_credentials(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> bool {
        self.begin_operation();

        if let Err(err) = self.provider.create_identity(email, password).await {
            return self.fail_operation(format!("Registration failed. {err}"));
        }
        if let Err(err) = self.provider.set_display_name(full_name).await {
            return self.fail_operation(format!("Registration failed. {err}"));
        }

        // Force a fresh credential: the provider's copy of the display name
        // may not have propagated into a cached one yet.
        let credential = match self.provider.mint_credential(true).await {
            Ok(credential) => credential,
            Err(err) => return self.fail_operation(format!("Registration failed. {err}")),
        };

        let request = ExchangeRequest {
            provider: "password".to_owned(),
            email: email.to_owned(),
            full_name: Some(full_name.to_owned()),
            password: Some(password.to_owned()),
            credential,
        };
        match self.api.exchange(&request).await {
            Ok(response) => self.adopt_exchange(response, Some(full_name)),
            Err(err) => self.fail_operation(format!("Registration failed. {err}")),
        }
    }

    /// Register extended trainer profile data under the stored session and
    /// merge the returned profile into the persisted user data.
    pub async fn register_trainer_profile(
        &self,
        bio: &str,
        certifications: Vec<String>,
        experience_years: u32,
    ) -> bool {
        self.begin_operation();

        let Some(token) = self.store.token() else {
            return self.fail_operation(
                "Authentication issue: please log in again to complete your profile.".to_owned(),
            );
        };

        let request = TrainerProfileRequest {
            bio: bio.to_owned(),
            certifications,
            experience_years,
        };
        match self.api.register_trainer(&token, &request).await {
            Ok(response) => {
                if let Some(mut profile) = self.store.profile() {
                    profile.trainer = Some(response.profile);
                    self.store.save(&token, &profile);
                    self.update_state(|s| s.user = Some(profile));
                }
                info!("auth: trainer profile registration successful");
                self.update_state(|s| s.loading = false);
                true
            }
            Err(err) => {
                self.fail_operation(format!("Failed to complete trainer profile setup. {err}"))
            }
        }
    }

    /// Sign out of the provider (best effort) and unconditionally clear the
    /// local session.
    pub async fn logout(&self) {
        if let Err(err) = self.provider.sign_out().await {
            warn!("auth: provider sign-out failed, clearing local session anyway: {err}");
        }
        self.store.clear();
        self.update_state(|s| {
            s.user = None;
            s.token = None;
            s.error = None;
            s.loading = false;
        });
        info!("auth: logged out");
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    async fn recover_from_identity(&self, identity: &Identity) -> Result<(), String> {
        let credential =
            self.provider.mint_credential(false).await.map_err(|err| err.to_string())?;
        let request = ExchangeRequest {
            provider: "google.com".to_owned(),
            email: identity.email.clone().unwrap_or_default(),
            full_name: identity.display_name.clone(),
            password: None,
            credential,
        };
        let response = self.api.exchange(&request).await.map_err(|err| err.to_string())?;
        if response.token.is_empty() {
            return Err("server returned no session token".to_owned());
        }
        self.adopt_session(&response.token, response.user);
        Ok(())
    }

    /// Adopt a backend exchange result. An empty session token is a hard
    /// failure: nothing is persisted.
    fn adopt_exchange(&self, response: ExchangeResponse, full_name: Option<&str>) -> bool {
        if response.token.is_empty() {
            return self.fail_operation("The server returned no session token.".to_owned());
        }
        let mut profile = response.user;
        if profile.full_name.is_none() {
            profile.full_name = full_name.map(str::to_owned);
        }
        self.adopt_session(&response.token, profile);
        self.update_state(|s| s.loading = false);
        true
    }

    fn adopt_session(&self, token: &str, profile: UserProfile) {
        self.store.save(token, &profile);
        let token = token.to_owned();
        self.update_state(|s| {
            s.token = Some(token);
            s.user = Some(profile);
            s.error = None;
        });
    }

    fn begin_operation(&self) {
        self.update_state(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn fail_operation(&self, message: String) -> bool {
        warn!("auth: {message}");
        self.update_state(|s| {
            s.loading = false;
            s.error = Some(message);
        });
        false
    }

    fn set_unauthenticated(&self) {
        self.update_state(|s| {
            s.user = None;
            s.token = None;
            s.loading = false;
        });
    }

    fn update_state(&self, mutate: impl FnOnce(&mut AuthState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };
        if let Some(callback) = self.on_change.borrow().clone() {
            callback(snapshot);
        }
    }
}

/// Run a reconciliation future from a subscription callback. Queued as a
/// task in the browser; driven to completion inline on native builds, where
/// callbacks only fire from synchronous test code.
fn spawn_reconcile(future: impl Future<Output = ()> + 'static) {
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(future);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        futures::executor::block_on(future);
    }
}
