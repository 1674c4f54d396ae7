//! Name → reducer registry bound to the application's single store.
//!
//! Micro-frontend bundles attach and detach their slices at runtime through
//! [`ReducerRegistry::add`] / [`ReducerRegistry::remove`].  Every change
//! installs a new immutable [`SliceTable`], derives a fresh combined reducer
//! from it and swaps that into the live store.  Misuse (empty or duplicate
//! names, unknown names) is reported through the `bool` return value only.
//!
//! The `USER_LOGOUT` gate is only in front of the reducer installed by
//! [`ReducerRegistry::init_store`] and [`ReducerRegistry::reset`].  `add` and
//! `remove` swap in the bare combined reducer, so logout does not clear the
//! state again until the next `reset`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::action::{Action, ActionCreator};
use super::devtools;
use super::engine::Store;
use super::reducer::{root_reducer, Reducer, SliceTable};

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Install the dev-tools inspection hook.
    pub devtools: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            devtools: cfg!(debug_assertions),
        }
    }
}

/// Registration request as sent by a feature bundle through the bridge.
#[derive(Clone)]
pub struct DynamicReducer {
    pub name: String,
    pub reducer: Reducer,
    pub default_state_action: Option<ActionCreator>,
    pub default_state_params: Option<Value>,
}

impl DynamicReducer {
    pub fn new(name: impl Into<String>, reducer: Reducer) -> Self {
        Self {
            name: name.into(),
            reducer,
            default_state_action: None,
            default_state_params: None,
        }
    }

    /// Seed the slice right after registration with `action(params)`.
    pub fn with_default_state(mut self, action: ActionCreator, params: Value) -> Self {
        self.default_state_action = Some(action);
        self.default_state_params = Some(params);
        self
    }
}

impl fmt::Debug for DynamicReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicReducer")
            .field("name", &self.name)
            .field("default_state_action", &self.default_state_action.is_some())
            .field("default_state_params", &self.default_state_params)
            .finish()
    }
}

#[derive(Default)]
pub struct ReducerRegistry {
    slices: RefCell<SliceTable>,
    store: RefCell<Option<Rc<Store>>>,
    logout_gate: Cell<bool>,
}

impl ReducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole mapping.  Meant to be called once, before
    /// [`init_store`](Self::init_store).
    pub fn add_reducers<S: Into<String>>(&self, reducers: impl IntoIterator<Item = (S, Reducer)>) {
        *self.slices.borrow_mut() = reducers.into_iter().collect();
    }

    /// Create the store from whatever is registered right now.  A registry
    /// owns at most one store; later calls return the existing one.
    pub fn init_store(&self, initial_state: Value, options: &StoreOptions) -> Rc<Store> {
        if let Some(store) = self.store() {
            log::warn!("init_store called twice; keeping the existing store");
            return store;
        }

        let reducer = root_reducer(self.slices.borrow().combine());
        let inspector = options.devtools.then(devtools::inspector);
        let store = Rc::new(Store::new(reducer, initial_state, inspector));
        *self.store.borrow_mut() = Some(Rc::clone(&store));
        self.logout_gate.set(true);
        store
    }

    pub fn store(&self) -> Option<Rc<Store>> {
        self.store.borrow().clone()
    }

    /// Full state tree, `None` before the store exists.
    pub fn get_state(&self) -> Option<Value> {
        self.store().map(|store| store.get_state())
    }

    /// Forward to the store.  `None` when there is no store yet or the
    /// action was refused.
    pub fn dispatch(&self, action: Action) -> Option<Action> {
        let store = self.store()?;
        match store.dispatch(action) {
            Ok(action) => Some(action),
            Err(e) => {
                log::error!("dispatch refused: {}", e);
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices.borrow().contains(name)
    }

    pub fn slice_names(&self) -> Vec<String> {
        self.slices.borrow().names().map(str::to_string).collect()
    }

    pub fn add(&self, name: &str, reducer: Reducer) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        let table = self.slices.borrow().with(name, reducer);
        self.install(table, false);
        log::debug!("reducer `{}` added", name);
        true
    }

    pub fn remove(&self, name: &str) -> bool {
        if name.is_empty() || !self.contains(name) {
            return false;
        }
        let table = self.slices.borrow().without(name);
        self.install(table, false);
        log::debug!("reducer `{}` removed", name);
        true
    }

    /// Detach every dynamically added slice, e.g. on logout.
    pub fn reset(&self) {
        self.install(SliceTable::empty(), true);
        log::debug!("reducer registry reset");
    }

    /// [`add`](Self::add), then seed the new slice when both a default
    /// action creator and its params are supplied.
    pub fn add_with_default_state(
        &self,
        name: &str,
        reducer: Reducer,
        default_action: Option<ActionCreator>,
        default_params: Option<Value>,
    ) -> bool {
        let added = self.add(name, reducer);
        if added {
            if let (Some(create), Some(params)) = (default_action, default_params) {
                self.dispatch(create(params));
            }
        }
        added
    }

    pub fn add_dynamic_reducer(&self, request: DynamicReducer) -> bool {
        self.add_with_default_state(
            &request.name,
            request.reducer,
            request.default_state_action,
            request.default_state_params,
        )
    }

    pub fn remove_dynamic_reducer(&self, name: &str) -> bool {
        self.remove(name)
    }

    /// Whether `USER_LOGOUT` currently clears the state tree.
    pub fn logout_gate_active(&self) -> bool {
        self.store().is_some() && self.logout_gate.get()
    }

    fn install(&self, table: SliceTable, logout_gate: bool) {
        let combined = table.combine();
        let reducer = if logout_gate {
            root_reducer(combined)
        } else {
            combined
        };
        *self.slices.borrow_mut() = table;
        self.logout_gate.set(logout_gate);
        // Clone out of the cell: replacing the reducer dispatches, and
        // listeners may call back into the registry.
        let store = self.store();
        if let Some(store) = store {
            store.replace_reducer(reducer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::todos::slice::{
        create_todos_creator, delete_todo_by_id_action, todos_reducer,
    };
    use crate::features::todos::TodoId;
    use crate::store::action::user_logout;
    use crate::store::reducer::reducer;
    use proptest::prelude::*;
    use serde_json::json;

    fn counter() -> Reducer {
        reducer(|state, action| {
            let n = state.and_then(Value::as_i64).unwrap_or(0);
            if action.is("counter/increment") {
                json!(n + 1)
            } else {
                json!(n)
            }
        })
    }

    fn registry_with_store() -> ReducerRegistry {
        let registry = ReducerRegistry::new();
        registry.init_store(json!({}), &StoreOptions { devtools: false });
        registry
    }

    #[test]
    fn get_state_is_none_before_the_store_exists() {
        let registry = ReducerRegistry::new();
        assert_eq!(registry.get_state(), None);
        assert_eq!(registry.dispatch(Action::of_type("anything")), None);
    }

    #[test]
    fn add_exposes_the_new_slice_immediately() {
        let registry = registry_with_store();
        assert!(registry.add("counter", counter()));
        assert_eq!(registry.get_state(), Some(json!({ "counter": 0 })));
    }

    #[test]
    fn duplicate_add_fails_and_keeps_state() {
        let registry = registry_with_store();
        assert!(registry.add("counter", counter()));
        registry.dispatch(Action::of_type("counter/increment"));

        let replacement = reducer(|_, _| json!("replaced"));
        assert!(!registry.add("counter", replacement));
        assert_eq!(registry.get_state(), Some(json!({ "counter": 1 })));
    }

    #[test]
    fn empty_names_are_rejected() {
        let registry = registry_with_store();
        assert!(!registry.add("", counter()));
        assert!(!registry.remove(""));
        assert!(registry.slice_names().is_empty());
    }

    #[test]
    fn removing_an_unknown_slice_changes_nothing() {
        let registry = registry_with_store();
        registry.add("counter", counter());
        assert!(!registry.remove("missing"));
        assert_eq!(registry.slice_names(), vec!["counter".to_string()]);
        assert_eq!(registry.get_state(), Some(json!({ "counter": 0 })));
    }

    #[test]
    fn remove_drops_the_slice_state() {
        let registry = registry_with_store();
        registry.add("a", counter());
        registry.add("b", counter());
        registry.dispatch(Action::of_type("counter/increment"));

        assert!(registry.remove("a"));
        assert_eq!(registry.get_state(), Some(json!({ "b": 1 })));
    }

    #[test]
    fn reset_detaches_every_slice() {
        let registry = registry_with_store();
        registry.add("a", counter());
        registry.add("b", counter());

        registry.reset();
        assert!(registry.slice_names().is_empty());

        registry.dispatch(Action::of_type("counter/increment"));
        assert_eq!(registry.get_state(), Some(json!({})));
    }

    #[test]
    fn reducers_added_before_the_store_are_used_at_creation() {
        let registry = ReducerRegistry::new();
        registry.add_reducers([("counter", counter())]);
        assert!(registry.add("late", counter()));

        registry.init_store(json!({ "counter": 3 }), &StoreOptions { devtools: false });
        assert_eq!(registry.get_state(), Some(json!({ "counter": 3, "late": 0 })));
    }

    #[test]
    fn init_store_twice_returns_the_same_store() {
        let registry = ReducerRegistry::new();
        let first = registry.init_store(json!({}), &StoreOptions { devtools: false });
        let second = registry.init_store(json!({ "x": 1 }), &StoreOptions { devtools: false });
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn logout_resets_slices_present_at_store_creation() {
        let registry = ReducerRegistry::new();
        registry.add_reducers([("counter", counter())]);
        registry.init_store(json!({ "counter": 5 }), &StoreOptions { devtools: false });

        registry.dispatch(user_logout());
        assert_eq!(registry.get_state(), Some(json!({ "counter": 0 })));
    }

    #[test]
    fn logout_is_ignored_after_a_dynamic_add() {
        let registry = registry_with_store();
        registry.add("c", counter());
        registry.dispatch(Action::of_type("counter/increment"));

        registry.dispatch(user_logout());
        assert_eq!(registry.get_state(), Some(json!({ "c": 1 })));
    }

    #[test]
    fn logout_is_ignored_after_a_dynamic_remove() {
        let registry = ReducerRegistry::new();
        registry.add_reducers([("a", counter()), ("b", counter())]);
        registry.init_store(json!({}), &StoreOptions { devtools: false });
        registry.dispatch(Action::of_type("counter/increment"));

        assert!(registry.remove("a"));
        registry.dispatch(user_logout());
        assert_eq!(registry.get_state(), Some(json!({ "b": 1 })));
    }

    #[test]
    fn reset_puts_the_logout_gate_back() {
        let registry = registry_with_store();
        assert!(registry.logout_gate_active());

        registry.add("c", counter());
        assert!(!registry.logout_gate_active());

        registry.reset();
        assert!(registry.logout_gate_active());
        registry.dispatch(user_logout());
        assert_eq!(registry.get_state(), Some(json!({})));
    }

    #[test]
    fn default_state_is_dispatched_after_registration() {
        let registry = registry_with_store();
        let added = registry.add_with_default_state(
            "todosSlice",
            todos_reducer(),
            Some(create_todos_creator()),
            Some(json!({ "todos": [{ "id": 1, "title": "a", "completed": false }] })),
        );
        assert!(added);

        let state = registry.get_state().unwrap();
        let todos = state["todosSlice"]["todos"].as_object().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos["1"]["title"], "a");

        registry.dispatch(delete_todo_by_id_action(TodoId::from(1)));
        let state = registry.get_state().unwrap();
        assert!(state["todosSlice"]["todos"].as_object().unwrap().is_empty());
    }

    #[test]
    fn default_state_needs_both_creator_and_params() {
        let registry = registry_with_store();
        let added = registry.add_with_default_state(
            "todosSlice",
            todos_reducer(),
            Some(create_todos_creator()),
            None,
        );
        assert!(added);
        let state = registry.get_state().unwrap();
        assert!(state["todosSlice"]["todos"].as_object().unwrap().is_empty());
    }

    #[test]
    fn failed_registration_does_not_seed_state() {
        let registry = registry_with_store();
        registry.add("todosSlice", todos_reducer());
        let added = registry.add_dynamic_reducer(
            DynamicReducer::new("todosSlice", todos_reducer()).with_default_state(
                create_todos_creator(),
                json!({ "todos": [{ "id": 2, "title": "b", "completed": true }] }),
            ),
        );
        assert!(!added);
        let state = registry.get_state().unwrap();
        assert!(state["todosSlice"]["todos"].as_object().unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn distinct_names_are_all_registered(names in prop::collection::btree_set("[a-z]{1,8}", 1..8)) {
            let registry = registry_with_store();
            for name in &names {
                prop_assert!(registry.add(name, counter()));
                prop_assert!(!registry.add(name, counter()));
            }
            let state = registry.get_state().unwrap();
            let keys: Vec<&String> = state.as_object().unwrap().keys().collect();
            prop_assert_eq!(keys, names.iter().collect::<Vec<_>>());
        }
    }
}
