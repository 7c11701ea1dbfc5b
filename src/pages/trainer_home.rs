//! Trainer portal landing page. Rendered behind the route guard, so the
//! auth state is always authenticated here.
//!
//! Trainers who signed up but never completed their trainer profile get an
//! inline form; submitting it registers the profile with the backend and
//! merges the result into the stored session.

use std::rc::Rc;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use send_wrapper::SendWrapper;

use crate::session::controller::SessionController;
use crate::state::auth::AuthState;

#[component]
pub fn TrainerHomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<SendWrapper<Rc<SessionController>>>();

    let bio = RwSignal::new(String::new());
    let certifications = RwSignal::new(String::new());
    let experience_years = RwSignal::new(String::new());

    let greeting = move || {
        let state = auth.get();
        let name = state
            .user
            .as_ref()
            .and_then(|user| user.full_name.clone())
            .or_else(|| state.user.as_ref().map(|user| user.email.clone()))
            .unwrap_or_default();
        format!("Welcome back, {name}")
    };

    let has_trainer_profile =
        move || auth.get().user.is_some_and(|user| user.trainer.is_some());

    let on_submit_profile = {
        let controller = controller.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            #[cfg(feature = "hydrate")]
            {
                let controller = controller.clone();
                let bio_value = bio.get_untracked();
                let certification_list: Vec<String> = certifications
                    .get_untracked()
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_owned)
                    .collect();
                let years = experience_years.get_untracked().trim().parse().unwrap_or(0);
                leptos::task::spawn_local(async move {
                    controller
                        .register_trainer_profile(&bio_value, certification_list, years)
                        .await;
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = &controller;
            }
        }
    };

    view! {
        <section class="trainer-home">
            <h1 class="trainer-home__greeting">{greeting}</h1>

            <Show
                when=has_trainer_profile
                fallback=move || {
                    view! {
                        <form class="trainer-home__profile-form" on:submit=on_submit_profile.clone()>
                            <h2>"Complete your trainer profile"</h2>
                            <label>
                                "Bio"
                                <textarea
                                    prop:value=move || bio.get()
                                    on:input=move |ev| bio.set(event_target_value(&ev))
                                ></textarea>
                            </label>
                            <label>
                                "Certifications (comma separated)"
                                <input
                                    type="text"
                                    prop:value=move || certifications.get()
                                    on:input=move |ev| {
                                        certifications.set(event_target_value(&ev))
                                    }
                                />
                            </label>
                            <label>
                                "Years of experience"
                                <input
                                    type="number"
                                    prop:value=move || experience_years.get()
                                    on:input=move |ev| {
                                        experience_years.set(event_target_value(&ev))
                                    }
                                />
                            </label>
                            {move || {
                                auth.get()
                                    .error
                                    .map(|message| {
                                        view! { <p class="trainer-home__error">{message}</p> }
                                    })
                            }}
                            <button type="submit" prop:disabled=move || auth.get().loading>
                                "Save Profile"
                            </button>
                        </form>
                    }
                }
            >
                <div class="trainer-home__dashboard">
                    <p>"Your trainer profile is active."</p>
                    <p>"Client scheduling and session plans are coming soon."</p>
                </div>
            </Show>
        </section>
    }
}
