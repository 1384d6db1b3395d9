#![allow(non_snake_case)]

pub mod app;
#[cfg(feature = "hydrate")]
pub mod auth0;
pub mod components;
pub mod pages;
#[cfg(feature = "ssr")]
pub mod server;
pub mod session;

pub use app::{shell, App};

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
