//! ROUTE GUARD
//! ===========
//!
//! Wrapper component for routes that require an authenticated trainer.
//!
//! BEHAVIOR
//! ========
//!
//! On mount (and whenever the auth snapshot changes) the guard asks the
//! session controller to validate the current session. While validation is
//! in flight a spinner renders instead of the protected content. Once the
//! auth state settles:
//!
//! - authenticated: children render
//! - not authenticated: redirect to `redirect_path`, carrying the page the
//!   visitor originally asked for as a `?from=` query so the sign-in page
//!   can send them back afterwards
//!
//! A fatal validation result is handled entirely inside the controller (it
//! clears the session and fires the fatal callback), so from the guard's
//! point of view fatal and denied look the same: a settled, unauthenticated
//! state that triggers the redirect.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;
use send_wrapper::SendWrapper;

use crate::session::controller::SessionController;
use crate::state::auth::AuthState;

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

/// True once the guard should bounce the visitor to the sign-in page.
///
/// Redirecting while `loading` or `validating` would kick out trainers whose
/// session is still being restored, so both must have settled first.
pub fn should_redirect(state: &AuthState, validating: bool) -> bool {
    !state.loading && !validating && !state.is_authenticated()
}

/// Builds the sign-in URL, preserving the originally requested path.
pub fn redirect_target(redirect_path: &str, from: &str) -> String {
    if from.is_empty() || from == "/" || from == redirect_path {
        redirect_path.to_owned()
    } else {
        format!("{redirect_path}?from={from}")
    }
}

#[component]
pub fn RouteGuard(
    /// Where to send visitors without a valid session.
    #[prop(into)]
    redirect_path: String,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<SendWrapper<Rc<SessionController>>>();
    let location = use_location();
    let navigate = use_navigate();
    let validating = RwSignal::new(true);

    // Validate whenever the auth snapshot changes. The controller owns the
    // retry budget; a fatal outcome surfaces here as a settled
    // unauthenticated state. The alive flag keeps a validation that
    // finishes after unmount from touching the signal.
    Effect::new(move || {
        let _snapshot = auth.get();
        validating.set(true);
        #[cfg(feature = "hydrate")]
        {
            use std::cell::Cell;

            let alive = Rc::new(Cell::new(true));
            on_cleanup({
                let alive = alive.clone();
                move || alive.set(false)
            });
            let controller = controller.clone();
            leptos::task::spawn_local(async move {
                let _ = controller.validate_for_route().await;
                if alive.get() {
                    validating.set(false);
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &controller;
            validating.set(false);
        }
    });

    Effect::new(move || {
        let state = auth.get();
        if should_redirect(&state, validating.get()) {
            let target = redirect_target(&redirect_path, &location.pathname.get());
            navigate(&target, NavigateOptions::default());
        }
    });

    view! {
        <Show
            when=move || {
                let state = auth.get();
                !state.loading && !validating.get() && state.is_authenticated()
            }
            fallback=|| {
                view! {
                    <div class="route-guard__loading">
                        <div class="spinner"></div>
                    </div>
                }
            }
        >
            {children()}
        </Show>
    }
}
