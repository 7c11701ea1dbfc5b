//! TRAINER SIGN-IN / REGISTRATION
//! ==============================
//!
//! Single page with two modes. Login signs into the identity provider with
//! email and password (or hands off to the hosted federated flow), then
//! exchanges the minted credential with the backend. Registration creates
//! the identity, sets the display name, and performs the same exchange.
//!
//! All of the actual work lives in the session controller; this page only
//! collects input, kicks off the async operation, and navigates away once
//! the auth state reports success. Errors surface through the shared auth
//! state and render inline.
//!
//! The `?from=` query, set by the route guard when it bounced an
//! unauthenticated visitor, decides where a successful sign-in lands.

use std::rc::Rc;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use leptos_router::NavigateOptions;
use send_wrapper::SendWrapper;

use crate::session::controller::SessionController;
use crate::state::auth::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

#[component]
pub fn TrainerAuthPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<SendWrapper<Rc<SessionController>>>();
    let navigate = use_navigate();
    let query = use_query_map();

    let mode = RwSignal::new(AuthMode::Login);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());

    // Only same-origin paths are honored; anything else falls back to the
    // portal landing page.
    let from_target = Memo::new(move |_| {
        query
            .get()
            .get("from")
            .filter(|from| from.starts_with('/'))
            .unwrap_or_else(|| "/trainer".to_owned())
    });

    // Already signed in (including returning from the hosted federated
    // flow): skip the form entirely.
    {
        let navigate = navigate.clone();
        Effect::new(move || {
            let state = auth.get();
            if !state.loading && state.is_authenticated() {
                navigate(&from_target.get(), NavigateOptions::default());
            }
        });
    }

    let on_submit = {
        let controller = controller.clone();
        let navigate = navigate.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            #[cfg(feature = "hydrate")]
            {
                let controller = controller.clone();
                let navigate = navigate.clone();
                let target = from_target.get_untracked();
                let submitted_mode = mode.get_untracked();
                let email_value = email.get_untracked();
                let password_value = password.get_untracked();
                let full_name_value = full_name.get_untracked();
                leptos::task::spawn_local(async move {
                    let ok = match submitted_mode {
                        AuthMode::Login => {
                            controller
                                .login_with_credentials(&email_value, &password_value)
                                .await
                        }
                        AuthMode::Register => {
                            controller
                                .register_with_credentials(
                                    &email_value,
                                    &password_value,
                                    &full_name_value,
                                )
                                .await
                        }
                    };
                    if ok {
                        navigate(&target, NavigateOptions::default());
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&controller, &navigate);
            }
        }
    };

    let on_google = {
        let controller = controller.clone();
        let navigate = navigate.clone();
        move |_| {
            #[cfg(feature = "hydrate")]
            {
                let controller = controller.clone();
                let navigate = navigate.clone();
                let target = from_target.get_untracked();
                leptos::task::spawn_local(async move {
                    // A hosted-flow handoff returns false without an error;
                    // the page is navigating away, so nothing to do here.
                    if controller.login_with_provider().await {
                        navigate(&target, NavigateOptions::default());
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&controller, &navigate);
            }
        }
    };

    view! {
        <section class="trainer-auth">
            <div class="trainer-auth__tabs">
                <button
                    class="trainer-auth__tab"
                    class:trainer-auth__tab--active=move || mode.get() == AuthMode::Login
                    on:click=move |_| mode.set(AuthMode::Login)
                >
                    "Sign In"
                </button>
                <button
                    class="trainer-auth__tab"
                    class:trainer-auth__tab--active=move || mode.get() == AuthMode::Register
                    on:click=move |_| mode.set(AuthMode::Register)
                >
                    "Register"
                </button>
            </div>

            <form class="trainer-auth__form" on:submit=on_submit>
                <Show when=move || mode.get() == AuthMode::Register>
                    <label>
                        "Full name"
                        <input
                            type="text"
                            prop:value=move || full_name.get()
                            on:input=move |ev| full_name.set(event_target_value(&ev))
                        />
                    </label>
                </Show>
                <label>
                    "Email"
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>

                {move || {
                    auth.get()
                        .error
                        .map(|message| view! { <p class="trainer-auth__error">{message}</p> })
                }}

                <button
                    type="submit"
                    class="trainer-auth__submit"
                    prop:disabled=move || auth.get().loading
                >
                    {move || {
                        if mode.get() == AuthMode::Login {
                            "Sign In"
                        } else {
                            "Create Account"
                        }
                    }}
                </button>
            </form>

            <button class="trainer-auth__google" on:click=on_google>
                "Continue with Google"
            </button>
        </section>
    }
}
