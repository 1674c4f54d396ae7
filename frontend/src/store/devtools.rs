//! Dev-tools inspection hook, installed when `StoreOptions::devtools` is set
//! (debug builds by default).

use serde_json::Value;

use super::action::Action;
use super::engine::Inspector;

pub fn inspector() -> Inspector {
    Box::new(|action: &Action, state: &Value| report(action, state))
}

#[cfg(target_arch = "wasm32")]
fn report(action: &Action, state: &Value) {
    use serde::Serialize;

    // Hand the browser console real JS objects so they can be expanded.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match (action.serialize(&serializer), state.serialize(&serializer)) {
        (Ok(action_js), Ok(state_js)) => {
            web_sys::console::debug_3(&"[store]".into(), &action_js, &state_js);
        }
        _ => log::debug!("[store] {} -> {}", action.kind, state),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn report(action: &Action, state: &Value) {
    log::debug!("[store] {} -> {}", action.kind, state);
}
