//! Standalone host: owns the registry/store and the global component list,
//! and exposes them to the app as a capability bundle, the way a shell
//! application would when loading this bundle as a remote.

use std::rc::Rc;

use crate::bridge::{
    AddComponentFn, AddReducerFn, Capabilities, DispatchFn, GetStateFn, GetStoreFn, MfTheme,
    RemoveComponentFn, RemoveReducerFn, RemoveThemeFn, SubscribeFn, Subscription, ThemeFn,
};
use crate::components::GlobalComponents;
use crate::store::ReducerRegistry;

pub struct Host {
    registry: Rc<ReducerRegistry>,
    components: Rc<GlobalComponents>,
}

impl Host {
    pub fn new(registry: Rc<ReducerRegistry>, components: Rc<GlobalComponents>) -> Self {
        Self {
            registry,
            components,
        }
    }

    pub fn registry(&self) -> &Rc<ReducerRegistry> {
        &self.registry
    }

    pub fn components(&self) -> &Rc<GlobalComponents> {
        &self.components
    }

    /// The bundle shared with the app.  Theme management is accepted but not
    /// implemented yet.
    pub fn capabilities(&self) -> Capabilities {
        let registry = &self.registry;
        let components = &self.components;

        let dispatch: DispatchFn = {
            let registry = Rc::clone(registry);
            Rc::new(move |action| registry.dispatch(action))
        };
        let get_state: GetStateFn = {
            let registry = Rc::clone(registry);
            Rc::new(move || registry.get_state())
        };
        let get_store: GetStoreFn = {
            let registry = Rc::clone(registry);
            Rc::new(move || registry.store())
        };
        let subscribe: SubscribeFn = {
            let registry = Rc::clone(registry);
            Rc::new(move |listener| match registry.store() {
                Some(store) => {
                    let id = store.subscribe(listener);
                    Some(Subscription::new(move || {
                        store.unsubscribe(id);
                    }))
                }
                None => {
                    log::warn!("subscribe before the store exists is ignored");
                    None
                }
            })
        };
        let add_dynamic_reducer: AddReducerFn = {
            let registry = Rc::clone(registry);
            Rc::new(move |request| registry.add_dynamic_reducer(request))
        };
        let remove_dynamic_reducer: RemoveReducerFn = {
            let registry = Rc::clone(registry);
            Rc::new(move |name| registry.remove_dynamic_reducer(name))
        };
        let add_global_component: AddComponentFn = {
            let components = Rc::clone(components);
            Rc::new(move |id, factory| components.add(id, factory))
        };
        let remove_global_component_by_id: RemoveComponentFn = {
            let components = Rc::clone(components);
            Rc::new(move |id| {
                components.remove_by_id(id);
            })
        };
        let add_mf_theme: ThemeFn = Rc::new(|theme: MfTheme| {
            log::debug!("addMFTheme `{}` ignored", theme.id);
        });
        let update_mf_theme: ThemeFn = Rc::new(|theme: MfTheme| {
            log::debug!("updateMFTheme `{}` ignored", theme.id);
        });
        let remove_mf_theme_by_id: RemoveThemeFn = Rc::new(|id: &str| {
            log::debug!("removeMFThemeById `{}` ignored", id);
        });

        Capabilities {
            dispatch: Some(dispatch),
            get_state: Some(get_state),
            get_store: Some(get_store),
            subscribe: Some(subscribe),
            add_dynamic_reducer: Some(add_dynamic_reducer),
            remove_dynamic_reducer: Some(remove_dynamic_reducer),
            add_global_component: Some(add_global_component),
            remove_global_component_by_id: Some(remove_global_component_by_id),
            add_mf_theme: Some(add_mf_theme),
            update_mf_theme: Some(update_mf_theme),
            remove_mf_theme_by_id: Some(remove_mf_theme_by_id),
        }
    }
}
