//! # tfc-portal
//!
//! Leptos + WASM frontend for The Fitness Club: the public marketing site
//! plus the trainer portal. The interesting machinery is the client-side
//! session lifecycle in [`session`]: restoring, validating, refreshing, and
//! tearing down a trainer session backed by browser `localStorage`, an
//! external identity provider, and the club backend.

pub mod app;
pub mod components;
pub mod identity;
pub mod net;
pub mod pages;
pub mod session;
pub mod state;
pub mod util;

/// Browser entry point. Trunk invokes this after loading the WASM module.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
