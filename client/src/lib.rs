//! Browser client for the auth server.
//!
//! ARCHITECTURE
//! ============
//! `state::sync` is the session synchronizer: it owns every transition of the
//! shared `AuthState` signal. Components only read that signal and ask the
//! synchronizer to act. Browser I/O sits behind the `SessionTransport` seam
//! so the state machine runs natively under test.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging, then mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("auth client starting");
    leptos::mount::mount_to_body(app::App);
}
