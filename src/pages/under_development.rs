//! Placeholder for pages that are not built yet; also serves as the
//! catch-all route.

use leptos::prelude::*;

#[component]
pub fn UnderDevelopmentPage() -> impl IntoView {
    view! {
        <section class="under-development">
            <h1>"Coming Soon"</h1>
            <p>"This page is under development. Check back shortly."</p>
            <a href="/">"Back to home"</a>
        </section>
    }
}
