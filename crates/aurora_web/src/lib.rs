//! # AURORA Web
//!
//! Binds [`aurora_effects`] to the browser: discovers the page, forwards
//! DOM events to the runtime's bus, and applies its commands every frame.
//!
//! The page contract ([`markup`]), configuration loading ([`settings`]) and
//! the console tracing layer ([`logging`]) build on every target; the DOM
//! bindings only on `wasm32`.

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod logging;
pub mod markup;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod host;
#[cfg(target_arch = "wasm32")]
pub mod listeners;

// `#[wasm_bindgen]` expands to unsafe FFI shims.
#[cfg(target_arch = "wasm32")]
#[allow(unsafe_code)]
mod entry {
    use tracing::level_filters::LevelFilter;
    use wasm_bindgen::prelude::wasm_bindgen;

    /// Module entry point.
    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        crate::logging::init(level);
        crate::app::start();
    }

    /// Stops the effects and detaches every listener.
    #[wasm_bindgen]
    pub fn shutdown() {
        crate::app::stop();
    }
}
