//! REST adapter for the hosted identity service.
//!
//! ARCHITECTURE
//! ============
//! The hosted service exposes password sign-in/sign-up, profile update, and
//! refresh-token endpoints. The adapter persists its own identity snapshot
//! (identity + id token + refresh token) in `localStorage`, which is what
//! keeps the provider signed in across reloads and lets other tabs observe
//! sign-in/sign-out through the browser's storage events.
//!
//! Outside the browser every network method is an inert stub; the native
//! build only ever talks to in-test fakes.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{Identity, IdentityCallback, IdentityProvider, IdentitySubscription, ProviderError};

/// localStorage key for the provider's own persisted state.
pub const PROVIDER_STATE_KEY: &str = "tfc_identity_provider_state";

/// Endpoints and API key for the hosted identity service.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub api_key: String,
    /// Base URL for account endpoints (sign-in, sign-up, update).
    pub auth_base: String,
    /// Base URL for the refresh-token endpoint.
    pub token_base: String,
    /// Hosted interactive sign-in page; federated flows redirect here.
    pub hosted_signin_url: String,
}

/// Persisted provider-side state: who is signed in and the tokens needed
/// to mint credentials for them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
struct ProviderState {
    identity: Identity,
    id_token: String,
    refresh_token: String,
    /// Epoch millis when `id_token` was issued.
    minted_at: u64,
}

/// Identity provider backed by the hosted REST service.
pub struct RestIdentityProvider {
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    config: IdentityConfig,
    subscribers: Rc<RefCell<Vec<(u64, IdentityCallback)>>>,
    next_subscriber: std::cell::Cell<u64>,
    #[cfg(feature = "hydrate")]
    _storage_listener: RefCell<Option<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::StorageEvent)>>>,
}

impl RestIdentityProvider {
    #[must_use]
    pub fn new(config: IdentityConfig) -> Rc<Self> {
        let provider = Rc::new(Self {
            config,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_subscriber: std::cell::Cell::new(0),
            #[cfg(feature = "hydrate")]
            _storage_listener: RefCell::new(None),
        });
        provider.install_storage_listener();
        provider
    }

    fn state(&self) -> Option<ProviderState> {
        let raw = read_persisted()?;
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!("identity: discarding unreadable provider state: {err}");
                None
            }
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    fn persist(&self, state: &ProviderState) {
        if let Ok(json) = serde_json::to_string(state) {
            write_persisted(Some(&json));
        }
    }

    fn notify(&self, identity: Option<Identity>) {
        let subscribers: Vec<IdentityCallback> =
            self.subscribers.borrow().iter().map(|(_, cb)| cb.clone()).collect();
        for callback in subscribers {
            callback(identity.clone());
        }
    }

    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    fn adopt(&self, identity: Identity, id_token: String, refresh_token: String) -> Identity {
        let state = ProviderState {
            identity: identity.clone(),
            id_token,
            refresh_token,
            minted_at: crate::util::clock::now_ms(),
        };
        self.persist(&state);
        self.notify(Some(identity.clone()));
        identity
    }

    /// Cross-tab sign-in/sign-out detection: watch the persisted provider
    /// state key and forward transitions to local subscribers.
    fn install_storage_listener(self: &Rc<Self>) {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;
            use wasm_bindgen::closure::Closure;

            let Some(window) = web_sys::window() else {
                return;
            };
            let weak = Rc::downgrade(self);
            let closure = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(
                move |event: web_sys::StorageEvent| {
                    if event.key().as_deref() != Some(PROVIDER_STATE_KEY) {
                        return;
                    }
                    if let Some(provider) = weak.upgrade() {
                        let identity = provider.state().map(|s| s.identity);
                        provider.notify(identity);
                    }
                },
            );
            let _ = window
                .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
            *self._storage_listener.borrow_mut() = Some(closure);
        }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for RestIdentityProvider {
    fn current_identity(&self) -> Option<Identity> {
        self.state().map(|s| s.identity)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let url = format!(
                "{}/v1/accounts:signInWithPassword?key={}",
                self.config.auth_base, self.config.api_key
            );
            let resp = post_credentials(&url, email, password).await?;
            info!("identity: password sign-in succeeded for {email}");
            Ok(self.adopt(resp.identity(), resp.id_token, resp.refresh_token))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(ProviderError::Provider("sign-in requires a browser".to_owned()))
        }
    }

    async fn sign_in_interactive(&self) -> Result<Identity, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            // Full-page redirect to the hosted flow; the page unloads and the
            // result is picked up from persisted provider state on return.
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(&self.config.hosted_signin_url);
            }
            Err(ProviderError::Redirected)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ProviderError::Provider("interactive sign-in requires a browser".to_owned()))
        }
    }

    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let url =
                format!("{}/v1/accounts:signUp?key={}", self.config.auth_base, self.config.api_key);
            let resp = post_credentials(&url, email, password).await?;
            info!("identity: created new identity for {email}");
            Ok(self.adopt(resp.identity(), resp.id_token, resp.refresh_token))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(ProviderError::Provider("sign-up requires a browser".to_owned()))
        }
    }

    async fn set_display_name(&self, name: &str) -> Result<(), ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let mut state = self.state().ok_or(ProviderError::NoIdentity)?;
            let url =
                format!("{}/v1/accounts:update?key={}", self.config.auth_base, self.config.api_key);
            let body = serde_json::json!({
                "idToken": state.id_token,
                "displayName": name,
                "returnSecureToken": false,
            });
            let resp = gloo_net::http::Request::post(&url)
                .json(&body)
                .map_err(|e| ProviderError::Provider(e.to_string()))?
                .send()
                .await
                .map_err(|e| ProviderError::Provider(e.to_string()))?;
            if !resp.ok() {
                return Err(error_from_status(resp).await);
            }
            state.identity.display_name = Some(name.to_owned());
            self.persist(&state);
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = name;
            Err(ProviderError::NoIdentity)
        }
    }

    async fn mint_credential(&self, force_fresh: bool) -> Result<String, ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let mut state = self.state().ok_or(ProviderError::NoIdentity)?;
            let age = crate::util::clock::now_ms().saturating_sub(state.minted_at);
            if !force_fresh && age < crate::session::store::TOKEN_STALE_MS {
                return Ok(state.id_token);
            }

            #[derive(Deserialize)]
            struct RefreshResponse {
                id_token: String,
                refresh_token: String,
            }

            let url = format!("{}/v1/token?key={}", self.config.token_base, self.config.api_key);
            let body = serde_json::json!({
                "grant_type": "refresh_token",
                "refresh_token": state.refresh_token,
            });
            let resp = gloo_net::http::Request::post(&url)
                .json(&body)
                .map_err(|e| ProviderError::Provider(e.to_string()))?
                .send()
                .await
                .map_err(|e| ProviderError::Provider(e.to_string()))?;
            if !resp.ok() {
                return Err(error_from_status(resp).await);
            }
            let refreshed: RefreshResponse =
                resp.json().await.map_err(|e| ProviderError::Provider(e.to_string()))?;
            state.id_token = refreshed.id_token.clone();
            state.refresh_token = refreshed.refresh_token;
            state.minted_at = crate::util::clock::now_ms();
            self.persist(&state);
            Ok(refreshed.id_token)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = force_fresh;
            Err(ProviderError::NoIdentity)
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        write_persisted(None);
        self.notify(None);
        info!("identity: signed out");
        Ok(())
    }

    fn subscribe_identity_changes(&self, callback: IdentityCallback) -> IdentitySubscription {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        self.subscribers.borrow_mut().push((id, callback));

        let subscribers = self.subscribers.clone();
        IdentitySubscription::new(Box::new(move || {
            subscribers.borrow_mut().retain(|(sub_id, _)| *sub_id != id);
        }))
    }
}

/// Response shape common to the sign-in and sign-up endpoints.
#[cfg(feature = "hydrate")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

#[cfg(feature = "hydrate")]
impl CredentialResponse {
    fn identity(&self) -> Identity {
        Identity {
            uid: self.local_id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

#[cfg(feature = "hydrate")]
async fn post_credentials(
    url: &str,
    email: &str,
    password: &str,
) -> Result<CredentialResponse, ProviderError> {
    let body = serde_json::json!({
        "email": email,
        "password": password,
        "returnSecureToken": true,
    });
    let resp = gloo_net::http::Request::post(url)
        .json(&body)
        .map_err(|e| ProviderError::Provider(e.to_string()))?
        .send()
        .await
        .map_err(|e| ProviderError::Provider(e.to_string()))?;
    if !resp.ok() {
        return Err(error_from_status(resp).await);
    }
    resp.json().await.map_err(|e| ProviderError::Provider(e.to_string()))
}

/// Map the service's error codes onto the provider error taxonomy.
#[cfg(feature = "hydrate")]
async fn error_from_status(resp: gloo_net::http::Response) -> ProviderError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => format!("http status {}", resp.status()),
    };
    match message.as_str() {
        m if m.starts_with("EMAIL_NOT_FOUND")
            || m.starts_with("INVALID_PASSWORD")
            || m.starts_with("INVALID_LOGIN_CREDENTIALS") =>
        {
            ProviderError::InvalidCredentials
        }
        m if m.starts_with("EMAIL_EXISTS") => ProviderError::EmailInUse,
        m if m.starts_with("WEAK_PASSWORD") => ProviderError::WeakPassword,
        m if m.starts_with("INVALID_EMAIL") => ProviderError::InvalidEmail,
        other => ProviderError::Provider(other.to_owned()),
    }
}

fn read_persisted() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(PROVIDER_STATE_KEY).ok().flatten())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

fn write_persisted(value: Option<&str>) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        match value {
            Some(json) => {
                let _ = storage.set_item(PROVIDER_STATE_KEY, json);
            }
            None => {
                let _ = storage.remove_item(PROVIDER_STATE_KEY);
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = value;
    }
}
