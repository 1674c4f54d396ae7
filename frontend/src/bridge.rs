//! The bridge between a host shell and this sub-application.
//!
//! The host builds a [`Capabilities`] bundle once and hands it over through
//! [`install_host_capabilities`]; feature code reads it back with
//! [`GlobalBridge::get_globals`].  Every capability is optional because a
//! host may not provide it, or may not have called in yet.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::ComponentFactory;
use crate::store::{Action, DynamicReducer, Listener, Store};

pub type DispatchFn = Rc<dyn Fn(Action) -> Option<Action>>;
pub type GetStateFn = Rc<dyn Fn() -> Option<Value>>;
pub type GetStoreFn = Rc<dyn Fn() -> Option<Rc<Store>>>;
pub type SubscribeFn = Rc<dyn Fn(Listener) -> Option<Subscription>>;
pub type AddReducerFn = Rc<dyn Fn(DynamicReducer) -> bool>;
pub type RemoveReducerFn = Rc<dyn Fn(&str) -> bool>;
pub type AddComponentFn = Rc<dyn Fn(&str, ComponentFactory)>;
pub type RemoveComponentFn = Rc<dyn Fn(&str)>;
pub type ThemeFn = Rc<dyn Fn(MfTheme)>;
pub type RemoveThemeFn = Rc<dyn Fn(&str)>;

/// A live store subscription.  Dropping it unsubscribes the listener.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// A theme a micro-frontend asks the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfTheme {
    pub id: String,
    #[serde(default)]
    pub options: Value,
}

#[derive(Clone, Default)]
pub struct Capabilities {
    pub dispatch: Option<DispatchFn>,
    pub get_state: Option<GetStateFn>,
    pub get_store: Option<GetStoreFn>,
    /// Re-render hook: run the listener after every dispatch.
    pub subscribe: Option<SubscribeFn>,
    pub add_dynamic_reducer: Option<AddReducerFn>,
    pub remove_dynamic_reducer: Option<RemoveReducerFn>,
    pub add_global_component: Option<AddComponentFn>,
    pub remove_global_component_by_id: Option<RemoveComponentFn>,
    pub add_mf_theme: Option<ThemeFn>,
    pub update_mf_theme: Option<ThemeFn>,
    pub remove_mf_theme_by_id: Option<RemoveThemeFn>,
}

impl Capabilities {
    pub fn is_empty(&self) -> bool {
        self.provided().is_empty()
    }

    /// Names of the capabilities that are present, for logging.
    pub fn provided(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut note = |present: bool, name| {
            if present {
                names.push(name);
            }
        };
        note(self.dispatch.is_some(), "dispatch");
        note(self.get_state.is_some(), "getState");
        note(self.get_store.is_some(), "getStore");
        note(self.subscribe.is_some(), "subscribe");
        note(self.add_dynamic_reducer.is_some(), "addDynamicReducer");
        note(self.remove_dynamic_reducer.is_some(), "removeDynamicReducer");
        note(self.add_global_component.is_some(), "addGlobalComponent");
        note(
            self.remove_global_component_by_id.is_some(),
            "removeGlobalComponentById",
        );
        note(self.add_mf_theme.is_some(), "addMFTheme");
        note(self.update_mf_theme.is_some(), "updateMFTheme");
        note(self.remove_mf_theme_by_id.is_some(), "removeMFThemeById");
        names
    }

    pub fn try_dispatch(&self, action: Action) -> Option<Action> {
        match &self.dispatch {
            Some(dispatch) => dispatch(action),
            None => {
                log::warn!("no dispatch capability; dropping `{}`", action.kind);
                None
            }
        }
    }

    pub fn try_get_state(&self) -> Option<Value> {
        self.get_state.as_ref().and_then(|get_state| get_state())
    }

    pub fn try_get_store(&self) -> Option<Rc<Store>> {
        self.get_store.as_ref().and_then(|get_store| get_store())
    }

    /// `None` when the host cannot notify us of state changes.  The listener
    /// stays registered until the returned handle is dropped.
    pub fn try_subscribe(&self, listener: Listener) -> Option<Subscription> {
        self.subscribe.as_ref().and_then(|subscribe| subscribe(listener))
    }

    /// `None` when the host did not provide the capability.
    pub fn try_add_dynamic_reducer(&self, request: DynamicReducer) -> Option<bool> {
        self.add_dynamic_reducer.as_ref().map(|add| add(request))
    }

    pub fn try_remove_dynamic_reducer(&self, name: &str) -> Option<bool> {
        self.remove_dynamic_reducer.as_ref().map(|remove| remove(name))
    }

    pub fn try_add_global_component(&self, id: &str, factory: ComponentFactory) -> bool {
        match &self.add_global_component {
            Some(add) => {
                add(id, factory);
                true
            }
            None => false,
        }
    }

    pub fn try_remove_global_component_by_id(&self, id: &str) -> bool {
        match &self.remove_global_component_by_id {
            Some(remove) => {
                remove(id);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("provided", &self.provided())
            .finish()
    }
}

/// Holds the capability bundle handed over by the host.  There is no removal:
/// the last bundle set wins.
#[derive(Debug, Default)]
pub struct GlobalBridge {
    globals: RefCell<Rc<Capabilities>>,
}

impl GlobalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignored when `globals` is `None`.
    pub fn set_globals(&self, globals: Option<Capabilities>) {
        let Some(globals) = globals else {
            return;
        };
        *self.globals.borrow_mut() = Rc::new(globals);
    }

    /// The current bundle; an empty one until the host has called in.
    pub fn get_globals(&self) -> Rc<Capabilities> {
        Rc::clone(&self.globals.borrow())
    }
}

/// Bootstrap step run once the host passes its shared capabilities down.
pub fn install_host_capabilities(bridge: &GlobalBridge, shared: Capabilities) {
    log::debug!("host capabilities installed: {:?}", shared.provided());
    bridge.set_globals(Some(shared));
}
