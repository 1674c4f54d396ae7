#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub mod app;
pub mod bridge;
pub mod components;
pub mod config;
pub mod constants;
pub mod features;
pub mod fetch;
pub mod host;
pub mod store;
pub mod toast;
pub mod utils;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod bootstrap;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
mod js_host;
#[cfg(target_arch = "wasm32")]
mod logging;

#[cfg(target_arch = "wasm32")]
use crate::fetch::BrowserFetcher;

// Standalone entry point: fetch env.config.json, then boot host and app.
#[cfg(all(target_arch = "wasm32", feature = "standalone"))]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    wasm_bindgen_futures::spawn_local(bootstrap::run(Rc::new(BrowserFetcher)));
    Ok(())
}

/// Mount the app inside a JavaScript shell.  `shared` is the shell's
/// capability object; the app renders into the element with `container_id`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = mountRemote)]
pub fn mount_remote(shared: JsValue, container_id: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    let container = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(container_id))
        .ok_or_else(|| JsValue::from_str(&format!("no element #{}", container_id)))?;

    bootstrap::mount(
        js_host::capabilities_from_js(&shared),
        None,
        container,
        &bootstrap::env_from_window(),
        Rc::new(BrowserFetcher),
    )
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = unmountRemote)]
pub fn unmount_remote() {
    bootstrap::unmount();
}

#[wasm_bindgen(js_name = mfVersion)]
pub fn mf_version() -> String {
    constants::MF_VERSION.to_string()
}
