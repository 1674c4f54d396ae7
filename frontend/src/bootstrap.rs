//! Browser startup: fetch the environment, build the host side, mount the app
//! and keep it rendered.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

use crate::app::App;
use crate::bridge::{install_host_capabilities, Capabilities, GlobalBridge, Subscription};
use crate::components::GlobalComponents;
use crate::config::{load_env_config, AppConfig, EnvConfig};
use crate::constants::{ENV_CONFIG_ALERT, ENV_CONFIG_URL, MF_VERSION, ROOT_ELEMENT_ID};
use crate::dom::DomRoot;
use crate::fetch::Fetcher;
use crate::host::Host;
use crate::store::{ReducerRegistry, StoreOptions};
use crate::toast::{DomToaster, Notifier};
use crate::view::UiNode;

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = RefCell::new(None);
}

/// A mounted app together with the DOM it renders into.
pub struct Runtime {
    app: App,
    // Only the standalone host owns global components; a shell renders its own.
    components: Option<Rc<GlobalComponents>>,
    root: DomRoot,
    render_pending: Cell<bool>,
    // Released on unmount so remounts do not pile up store listeners.
    subscription: RefCell<Option<Subscription>>,
}

impl Runtime {
    fn render(&self) {
        let mut nodes = self
            .components
            .as_ref()
            .map(|c| c.render())
            .unwrap_or_default();
        nodes.push(self.app.view());
        if let Err(e) = self.root.render(&UiNode::fragment(nodes)) {
            log::error!("render failed: {:?}", e);
        }
    }

    /// Coalesce re-renders into the next tick.  Rendering replaces the click
    /// listeners, so it never runs inside one.
    fn schedule_render(self: &Rc<Self>) {
        if self.render_pending.replace(true) {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        Timeout::new(0, move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.render_pending.set(false);
                runtime.render();
            }
        })
        .forget();
    }
}

/// Standalone startup.  A failed environment fetch is reported but does not
/// stop the app.
pub async fn run(fetcher: Rc<dyn Fetcher>) {
    let env = match load_env_config(fetcher.as_ref(), ENV_CONFIG_URL).await {
        Ok(env) => env,
        Err(e) => {
            log::error!("{}", e);
            if let Some(window) = web_sys::window() {
                warn_on_failure("environment alert", window.alert_with_message(ENV_CONFIG_ALERT));
            }
            EnvConfig::default()
        }
    };
    if let Err(e) = publish_env(&env) {
        log::warn!("could not expose the environment on window: {:?}", e);
    }
    if let Err(e) = boot_standalone(&env, fetcher) {
        log::error!("startup failed: {:?}", e);
    }
}

fn boot_standalone(env: &EnvConfig, fetcher: Rc<dyn Fetcher>) -> Result<(), JsValue> {
    let registry = Rc::new(ReducerRegistry::new());
    registry.init_store(json!({}), &StoreOptions::default());
    let components = Rc::new(GlobalComponents::new());
    let host = Host::new(registry, Rc::clone(&components));

    expose_version()?;
    let document = document()?;
    if let Some(body) = document.body() {
        body.style().set_property("margin", "0")?;
    }
    let container = ensure_container(&document, ROOT_ELEMENT_ID)?;

    mount(host.capabilities(), Some(components), container, env, fetcher)
}

/// Mount the app into `container` using the capabilities `shared` by a host.
/// A previous mount is torn down first.
pub fn mount(
    shared: Capabilities,
    components: Option<Rc<GlobalComponents>>,
    container: Element,
    env: &EnvConfig,
    fetcher: Rc<dyn Fetcher>,
) -> Result<(), JsValue> {
    unmount();

    let bridge = Rc::new(GlobalBridge::new());
    install_host_capabilities(&bridge, shared);
    let notifier: Rc<dyn Notifier> = Rc::new(DomToaster);
    let app = App::new(Rc::clone(&bridge), fetcher, notifier, &AppConfig::from_env(env));

    let runtime = Rc::new(Runtime {
        app,
        components,
        root: DomRoot::new(container),
        render_pending: Cell::new(false),
        subscription: RefCell::new(None),
    });

    let weak = Rc::downgrade(&runtime);
    let on_change: Rc<dyn Fn()> = Rc::new(move || {
        if let Some(runtime) = weak.upgrade() {
            runtime.schedule_render();
        }
    });
    match bridge.get_globals().try_subscribe(Rc::clone(&on_change)) {
        Some(subscription) => *runtime.subscription.borrow_mut() = Some(subscription),
        None => log::warn!("host offers no subscribe; the list will not follow the store"),
    }
    if let Some(components) = &runtime.components {
        components.set_on_change(on_change);
    }

    runtime.render();
    spawn_local(runtime.app.mount());
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    Ok(())
}

/// Destroy the mounted app, if any, and empty its container.
pub fn unmount() {
    let previous = RUNTIME.with(|slot| slot.borrow_mut().take());
    if let Some(runtime) = previous {
        if let Some(subscription) = runtime.subscription.borrow_mut().take() {
            subscription.cancel();
        }
        runtime.app.unmount();
        runtime.root.clear();
        log::debug!("unmounted from #{}", runtime.root.container().id());
    }
}

/// Log a failed browser call that startup can live without.
fn warn_on_failure(what: &str, result: Result<(), JsValue>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not show the {}: {:?}", what, e);
            false
        }
    }
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn ensure_container(document: &Document, id: &str) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id(id) {
        return Ok(el);
    }
    let el = document.create_element("div")?;
    el.set_id(id);
    document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&el)?;
    Ok(el)
}

fn expose_version() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    js_sys::Reflect::set(&window, &"MF_VERSION".into(), &MF_VERSION.into())?;
    Ok(())
}

fn publish_env(env: &EnvConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let value = env.serialize(&serializer)?;
    js_sys::Reflect::set(&window, &"_env".into(), &value)?;
    Ok(())
}

/// The environment a previous standalone boot (or the shell) left on
/// `window._env`.
pub fn env_from_window() -> EnvConfig {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &"_env".into()).ok())
        .filter(|v| v.is_object())
        .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
        .unwrap_or_default()
}
