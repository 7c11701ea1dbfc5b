//! Top navigation bar. Public links are static; the trainer entry swaps
//! between a sign-in link and the portal link plus sign-out depending on the
//! auth state.

use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;

use crate::session::controller::SessionController;
use crate::state::auth::AuthState;

#[component]
pub fn Navigation() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<SendWrapper<Rc<SessionController>>>();

    view! {
        <nav class="site-nav">
            <a href="/" class="site-nav__brand">
                "The Fitness Club"
            </a>
            <div class="site-nav__links">
                <a href="/">"Home"</a>
                <a href="/packages">"Packages"</a>
                <a href="/about">"About"</a>
                {move || {
                    if auth.get().is_authenticated() {
                        let controller = controller.clone();
                        let on_logout = move |_| {
                            #[cfg(feature = "hydrate")]
                            {
                                let controller = controller.clone();
                                leptos::task::spawn_local(async move {
                                    controller.logout().await;
                                });
                            }
                            #[cfg(not(feature = "hydrate"))]
                            {
                                let _ = &controller;
                            }
                        };
                        view! {
                            <a href="/trainer" class="site-nav__trainer">
                                "Trainer Portal"
                            </a>
                            <button class="site-nav__logout" on:click=on_logout>
                                "Sign Out"
                            </button>
                        }
                            .into_any()
                    } else {
                        view! {
                            <a href="/trainer/login" class="site-nav__trainer">
                                "Trainer Sign In"
                            </a>
                        }
                            .into_any()
                    }
                }}
            </div>
        </nav>
    }
}
