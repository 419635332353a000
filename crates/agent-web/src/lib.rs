//! Agent Studio Web Frontend
//!
//! Leptos-based WASM frontend: sidebar settings, conversation history and
//! the chat view, backed by a [`agent_core::ChatSession`].

mod app;
mod pages;
mod components;
mod api;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
