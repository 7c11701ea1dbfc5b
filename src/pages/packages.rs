//! Membership packages page.
//!
//! Packages come from the public backend endpoint; no authentication is
//! involved. The page holds its own fetch state rather than going through
//! the session controller, which only deals with trainer sessions.

use leptos::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipPackage {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub price: String,
    #[serde(default)]
    pub whats_included: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
struct PackagesResponse {
    packages: Vec<MembershipPackage>,
}

#[cfg(feature = "hydrate")]
async fn fetch_packages() -> Result<Vec<MembershipPackage>, String> {
    let response = gloo_net::http::Request::get("/api/membership/packages")
        .send()
        .await
        .map_err(|err| err.to_string())?;
    if !response.ok() {
        return Err(format!("Failed to load packages ({})", response.status()));
    }
    let body: PackagesResponse = response.json().await.map_err(|err| err.to_string())?;
    Ok(body.packages)
}

#[component]
pub fn PackagesPage() -> impl IntoView {
    let packages = RwSignal::new(None::<Result<Vec<MembershipPackage>, String>>);

    Effect::new(move || {
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(async move {
                packages.set(Some(fetch_packages().await));
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            packages.set(Some(Ok(Vec::new())));
        }
    });

    view! {
        <section class="packages">
            <h1 class="packages__title">"Membership Packages"</h1>
            {move || match packages.get() {
                None => {
                    view! {
                        <div class="packages__loading">
                            <div class="spinner"></div>
                            <p>"Loading packages..."</p>
                        </div>
                    }
                        .into_any()
                }
                Some(Err(message)) => {
                    view! {
                        <div class="packages__error">
                            <p>"Failed to load packages"</p>
                            <p class="packages__error-detail">{message}</p>
                        </div>
                    }
                        .into_any()
                }
                Some(Ok(items)) if items.is_empty() => {
                    view! { <p class="packages__empty">"No packages available at the moment."</p> }
                        .into_any()
                }
                Some(Ok(items)) => {
                    items
                        .into_iter()
                        .map(|pkg| {
                            view! {
                                <article class="package-card">
                                    <h2 class="package-card__title">{pkg.title}</h2>
                                    <p class="package-card__description">
                                        {pkg.short_description}
                                    </p>
                                    <p class="package-card__price">{pkg.price}</p>
                                    <ul class="package-card__included">
                                        {pkg
                                            .whats_included
                                            .into_iter()
                                            .map(|item| view! { <li>{item}</li> })
                                            .collect_view()}
                                    </ul>
                                </article>
                            }
                        })
                        .collect_view()
                        .into_any()
                }
            }}
        </section>
    }
}
