//! SESSION MANAGER
//! ===============
//!
//! Invisible component that keeps an authenticated session healthy while the
//! app is open. Two triggers, both funnelled through the session controller:
//!
//! - NAVIGATION: every route change runs a lightweight refresh that touches
//!   the activity timestamp and rotates the stored token if the identity
//!   provider has minted a new one since the last check.
//! - TIMER: while the visitor is authenticated, the same check runs every
//!   ten minutes so a tab left open on one page does not silently expire.
//!
//! CANCELLATION
//! ============
//!
//! The timer loop holds an alive flag that `on_cleanup` flips when the auth
//! state changes or the component unmounts, so a signed-out visitor never
//! has a stale loop refreshing on their behalf.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use send_wrapper::SendWrapper;

use crate::session::controller::SessionController;
use crate::state::auth::AuthState;

/// Interval between background session checks.
pub const PERIODIC_REFRESH_MS: u32 = 10 * 60 * 1000;

#[component]
pub fn SessionManager() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<SendWrapper<Rc<SessionController>>>();
    let location = use_location();

    // Navigation-triggered refresh on every route change.
    {
        let controller = controller.clone();
        Effect::new(move || {
            let _path = location.pathname.get();
            #[cfg(feature = "hydrate")]
            {
                let controller = controller.clone();
                leptos::task::spawn_local(async move {
                    controller.navigation_refresh().await;
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = &controller;
            }
        });
    }

    // Tracking the boolean through a memo keeps token rotations from
    // restarting the timer loop; only sign-in and sign-out do.
    let authenticated = Memo::new(move |_| auth.get().is_authenticated());

    Effect::new(move || {
        let active = authenticated.get();
        #[cfg(feature = "hydrate")]
        {
            use std::cell::Cell;

            if active {
                let alive = Rc::new(Cell::new(true));
                on_cleanup({
                    let alive = alive.clone();
                    move || alive.set(false)
                });
                let controller = controller.clone();
                leptos::task::spawn_local(async move {
                    // Immediate agreement check, then the interval loop.
                    controller.periodic_check().await;
                    loop {
                        gloo_timers::future::TimeoutFuture::new(PERIODIC_REFRESH_MS).await;
                        if !alive.get() {
                            break;
                        }
                        controller.periodic_check().await;
                    }
                });
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (active, &controller);
        }
    });
}
