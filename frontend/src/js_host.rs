//! Adapter for JavaScript shells: turns the capability object a host passes to
//! `mountRemote` into a [`Capabilities`] bundle.
//!
//! Keys follow the shell contract (`dispatch`, `getState`, `getStore`,
//! `addDynamicReducer`, ...).  Anything missing or not a function is left out.

use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::bridge::{
    AddReducerFn, Capabilities, DispatchFn, GetStateFn, MfTheme, RemoveReducerFn, RemoveThemeFn,
    SubscribeFn, Subscription, ThemeFn,
};
use crate::store::{Action, DynamicReducer};

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Option<T> {
    if value.is_undefined() {
        return None;
    }
    serde_wasm_bindgen::from_value(value).ok()
}

fn function(shared: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(shared, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn report(name: &str, result: Result<JsValue, JsValue>) -> Option<JsValue> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("host `{}` failed: {:?}", name, e);
            None
        }
    }
}

pub fn capabilities_from_js(shared: &JsValue) -> Capabilities {
    let mut caps = Capabilities::default();

    if let Some(f) = function(shared, "dispatch") {
        let dispatch: DispatchFn = Rc::new(move |action: Action| {
            let arg = report("dispatch", to_js(&action))?;
            let returned = report("dispatch", f.call1(&JsValue::NULL, &arg))?;
            Some(from_js(returned).unwrap_or(action))
        });
        caps.dispatch = Some(dispatch);
    }

    if let Some(f) = function(shared, "getState") {
        let get_state: GetStateFn =
            Rc::new(move || from_js::<Value>(report("getState", f.call0(&JsValue::NULL))?));
        caps.get_state = Some(get_state);
    }

    // A JS store has no Rust handle; only its `subscribe` is reachable.
    if let Some(get_store) = function(shared, "getStore") {
        let subscribe: SubscribeFn = Rc::new(move |listener| {
            let store = report("getStore", get_store.call0(&JsValue::NULL))?;
            let Some(subscribe) = function(&store, "subscribe") else {
                log::warn!("host store has no subscribe");
                return None;
            };
            let callback = Closure::<dyn Fn()>::new(move || listener());
            let unsubscribe = report("subscribe", subscribe.call1(&store, callback.as_ref()))?
                .dyn_into::<Function>()
                .ok();
            // The callback must outlive its registration in the host store.
            Some(Subscription::new(move || {
                if let Some(unsubscribe) = unsubscribe {
                    report("unsubscribe", unsubscribe.call0(&JsValue::NULL));
                }
                drop(callback);
            }))
        });
        caps.subscribe = Some(subscribe);
    }

    if let Some(f) = function(shared, "addDynamicReducer") {
        let add: AddReducerFn = Rc::new(move |request: DynamicReducer| {
            let arg = match reducer_request(&request) {
                Ok(arg) => arg,
                Err(e) => {
                    log::error!("could not pass reducer `{}` to the host: {:?}", request.name, e);
                    return false;
                }
            };
            report("addDynamicReducer", f.call1(&JsValue::NULL, &arg))
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        });
        caps.add_dynamic_reducer = Some(add);
    }

    if let Some(f) = function(shared, "removeDynamicReducer") {
        let remove: RemoveReducerFn = Rc::new(move |name: &str| {
            let arg = Object::new();
            if Reflect::set(&arg, &"reducerName".into(), &name.into()).is_err() {
                return false;
            }
            report("removeDynamicReducer", f.call1(&JsValue::NULL, &arg))
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        });
        caps.remove_dynamic_reducer = Some(remove);
    }

    for (key, slot) in [
        ("addMFTheme", &mut caps.add_mf_theme),
        ("updateMFTheme", &mut caps.update_mf_theme),
    ] {
        if let Some(f) = function(shared, key) {
            let theme_fn: ThemeFn = Rc::new(move |theme: MfTheme| {
                if let Some(arg) = report(key, to_js(&theme)) {
                    report(key, f.call1(&JsValue::NULL, &arg));
                }
            });
            *slot = Some(theme_fn);
        }
    }

    if let Some(f) = function(shared, "removeMFThemeById") {
        let remove: RemoveThemeFn = Rc::new(move |id: &str| {
            report("removeMFThemeById", f.call1(&JsValue::NULL, &id.into()));
        });
        caps.remove_mf_theme_by_id = Some(remove);
    }

    // Global components are host UI; a JS shell cannot render our view tree.
    if function(shared, "addGlobalComponent").is_some() {
        log::debug!("addGlobalComponent is not bridged for JS hosts");
    }

    caps
}

/// `{ reducerName, reducer, defaultStateAction?, defaultStateParams? }` with
/// the Rust reducer wrapped as a JS function.
fn reducer_request(request: &DynamicReducer) -> Result<JsValue, JsValue> {
    let arg = Object::new();
    Reflect::set(&arg, &"reducerName".into(), &request.name.as_str().into())?;

    let reducer = Rc::clone(&request.reducer);
    let wrapped = Closure::<dyn Fn(JsValue, JsValue) -> JsValue>::new(
        move |state: JsValue, action: JsValue| {
            let previous = from_js::<Value>(state.clone());
            let Some(action) = from_js::<Action>(action) else {
                return state;
            };
            let next = reducer(previous.as_ref(), &action);
            to_js(&next).unwrap_or(state)
        },
    );
    Reflect::set(&arg, &"reducer".into(), &wrapped.into_js_value())?;

    if let (Some(creator), Some(params)) = (&request.default_state_action, &request.default_state_params) {
        let creator = Rc::clone(creator);
        let wrapped = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |params: JsValue| {
            let params = from_js::<Value>(params).unwrap_or(Value::Null);
            to_js(&creator(params)).unwrap_or(JsValue::UNDEFINED)
        });
        Reflect::set(&arg, &"defaultStateAction".into(), &wrapped.into_js_value())?;
        Reflect::set(&arg, &"defaultStateParams".into(), &to_js(params)?)?;
    }

    Ok(arg.into())
}
