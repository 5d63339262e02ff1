//! Ornament Countdown WASM Web Runtime
//!
//! Draws the ornament scene into the page's canvas with wgpu, lets the
//! pointer push ornaments around through an invisible collider, and renders
//! the countdown into a DOM container.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
pub mod input;
pub mod runtime_slot;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use app::SceneHandle;

/// Entry point, called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Ornament web runtime initialized");
}

/// Build the scene and start it.
///
/// `config_toml` overrides the stock scene settings. Resolves once the
/// renderer is ready and the first animation frame is scheduled.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn launch(config_toml: Option<String>) -> Result<SceneHandle, JsValue> {
    app::launch(config_toml).await
}
