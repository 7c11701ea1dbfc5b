//! APPLICATION ROOT
//! ================
//!
//! Wires the session machinery together and sets up client-side routing.
//!
//! WIRING
//! ======
//!
//! One `SessionController` is built per app instance, from:
//!
//! - browser `localStorage` (memory-backed outside of WASM)
//! - the REST identity provider, configured at compile time
//! - the backend exchange client
//!
//! The controller pushes every state change into an `RwSignal<AuthState>`;
//! both are provided as context so any page or component can read the auth
//! state reactively or invoke session operations. An unrecoverable
//! validation failure triggers a full page reload, which restarts the whole
//! lifecycle from storage.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use send_wrapper::SendWrapper;

use crate::components::navigation::Navigation;
use crate::components::route_guard::RouteGuard;
use crate::components::session_manager::SessionManager;
use crate::identity::rest::{IdentityConfig, RestIdentityProvider};
use crate::identity::IdentityProvider;
use crate::net::api::HttpExchangeApi;
use crate::pages::home::HomePage;
use crate::pages::packages::PackagesPage;
use crate::pages::trainer_auth::TrainerAuthPage;
use crate::pages::trainer_home::TrainerHomePage;
use crate::pages::under_development::UnderDevelopmentPage;
use crate::session::controller::SessionController;
use crate::session::storage::browser_or_memory;
use crate::session::store::SessionStore;
use crate::state::auth::AuthState;

/// Identity provider endpoints, baked in at compile time. Defaults point at
/// the hosted identity service; deployments override via build environment.
fn identity_config() -> IdentityConfig {
    IdentityConfig {
        api_key: option_env!("TFC_IDENTITY_API_KEY").unwrap_or_default().to_owned(),
        auth_base: option_env!("TFC_IDENTITY_AUTH_BASE")
            .unwrap_or("https://identitytoolkit.googleapis.com")
            .to_owned(),
        token_base: option_env!("TFC_IDENTITY_TOKEN_BASE")
            .unwrap_or("https://securetoken.googleapis.com")
            .to_owned(),
        hosted_signin_url: option_env!("TFC_IDENTITY_SIGNIN_URL")
            .unwrap_or("https://auth.thefitnessclub.in/signin")
            .to_owned(),
    }
}

/// Backend base URL; empty means same-origin relative requests.
fn api_base_url() -> String {
    option_env!("TFC_API_BASE_URL").unwrap_or_default().to_owned()
}

/// Root application component.
///
/// Provides the auth state and session controller contexts and sets up
/// client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());

    let provider: Rc<dyn IdentityProvider> = RestIdentityProvider::new(identity_config());
    let api = Rc::new(HttpExchangeApi::new(api_base_url()));
    let store = SessionStore::new(browser_or_memory());
    let controller = SessionController::new(provider, api, store);

    controller.set_on_change(move |state| auth.set(state));
    controller.set_on_fatal(|| {
        #[cfg(feature = "hydrate")]
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    });
    controller.start();

    provide_context(auth);
    provide_context(SendWrapper::new(Rc::clone(&controller)));

    // Restore any stored session before the first guarded route renders.
    #[cfg(feature = "hydrate")]
    {
        let controller = Rc::clone(&controller);
        leptos::task::spawn_local(async move {
            controller.restore_session().await;
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        // No browser storage to restore from; settle immediately.
        auth.update(|state| state.loading = false);
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/tfc-portal.css"/>
        <Title text="The Fitness Club"/>

        <Router>
            <Navigation/>
            <SessionManager/>
            <main class="site-main">
                <Routes fallback=UnderDevelopmentPage>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("packages") view=PackagesPage/>
                    <Route path=StaticSegment("about") view=UnderDevelopmentPage/>
                    <Route
                        path=(StaticSegment("trainer"), StaticSegment("login"))
                        view=TrainerAuthPage
                    />
                    <Route
                        path=StaticSegment("trainer")
                        view=|| {
                            view! {
                                <RouteGuard redirect_path="/trainer/login">
                                    <TrainerHomePage/>
                                </RouteGuard>
                            }
                        }
                    />
                </Routes>
            </main>
        </Router>
    }
}
