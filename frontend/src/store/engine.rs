//! The store: current state tree, current reducer and the subscriber list.
//!
//! Everything lives behind `RefCell`/`Cell` because the app is single
//! threaded and the store is shared through `Rc` by the registry, the host
//! capability bundle and the render loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;

use super::action::{Action, INIT, REPLACE};
use super::reducer::Reducer;

/// Called after every successful dispatch.
pub type Listener = Rc<dyn Fn()>;

/// Inspection hook fed with each action and the resulting state.
pub type Inspector = Box<dyn Fn(&Action, &Value)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("reducers may not dispatch actions (got `{0}` while reducing)")]
    Reducing(String),
}

pub struct Store {
    state: RefCell<Value>,
    reducer: RefCell<Reducer>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
    dispatching: Cell<bool>,
    inspector: Option<Inspector>,
}

impl Store {
    /// Build a store around `reducer`, seeded with `preloaded_state`, and run
    /// the init action so registered slices materialise their defaults.
    pub fn new(reducer: Reducer, preloaded_state: Value, inspector: Option<Inspector>) -> Self {
        let store = Self {
            state: RefCell::new(preloaded_state),
            reducer: RefCell::new(reducer),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            dispatching: Cell::new(false),
            inspector,
        };
        if let Err(e) = store.dispatch(Action::of_type(INIT)) {
            log::error!("store init failed: {}", e);
        }
        store
    }

    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        if self.dispatching.get() {
            return Err(StoreError::Reducing(action.kind));
        }

        let reducer = Rc::clone(&self.reducer.borrow());
        let next = {
            let _guard = DispatchGuard::enter(&self.dispatching);
            let state = self.state.borrow();
            reducer(Some(&state), &action)
        };
        *self.state.borrow_mut() = next;

        if let Some(inspect) = &self.inspector {
            inspect(&action, &self.state.borrow());
        }

        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }

        Ok(action)
    }

    /// Snapshot of the full state tree.
    pub fn get_state(&self) -> Value {
        self.state.borrow().clone()
    }

    /// Borrow the state tree without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Swap the reducer used by every later dispatch.  Slices the new reducer
    /// still knows keep their state, new ones get their initial state and
    /// unknown ones are dropped.
    pub fn replace_reducer(&self, reducer: Reducer) {
        *self.reducer.borrow_mut() = reducer;
        if let Err(e) = self.dispatch(Action::of_type(REPLACE)) {
            log::warn!("reducer replaced during dispatch: {}", e);
        }
    }

    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatching.get()
    }
}

/// Clears the dispatching flag even if a reducer panics.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::reducer::{reducer, SliceTable};
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

    fn counter_store() -> Store {
        let table = SliceTable::empty().with("counter", counter());
        Store::new(table.combine(), json!({}), None)
    }

    #[test]
    fn init_materialises_slice_defaults() {
        let store = counter_store();
        assert_eq!(store.get_state(), json!({ "counter": 0 }));
    }

    #[test]
    fn preloaded_state_is_kept_for_known_slices() {
        let table = SliceTable::empty().with("counter", counter());
        let store = Store::new(table.combine(), json!({ "counter": 41 }), None);
        store
            .dispatch(Action::of_type("counter/increment"))
            .expect("dispatch");
        assert_eq!(store.get_state(), json!({ "counter": 42 }));
    }

    #[test]
    fn replace_reducer_keeps_untouched_slices() {
        let store = counter_store();
        store.dispatch(Action::of_type("counter/increment")).unwrap();

        let grown = SliceTable::empty()
            .with("counter", counter())
            .with("other", counter());
        store.replace_reducer(grown.combine());
        assert_eq!(store.get_state(), json!({ "counter": 1, "other": 0 }));

        let shrunk = SliceTable::empty().with("other", counter());
        store.replace_reducer(shrunk.combine());
        assert_eq!(store.get_state(), json!({ "other": 0 }));
    }

    #[test]
    fn listeners_run_after_dispatch_until_unsubscribed() {
        let store = counter_store();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let id = store.subscribe(Rc::new(move || seen.set(seen.get() + 1)));

        store.dispatch(Action::of_type("counter/increment")).unwrap();
        store.dispatch(Action::of_type("counter/increment")).unwrap();
        assert_eq!(calls.get(), 2);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        assert_eq!(store.listener_count(), 0);
        store.dispatch(Action::of_type("counter/increment")).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn reducers_cannot_dispatch() {
        let store = Rc::new(Store::new(SliceTable::empty().combine(), json!({}), None));
        let inner = Rc::downgrade(&store);
        let nested = Rc::new(RefCell::new(None));
        let nested_result = Rc::clone(&nested);

        store.replace_reducer(reducer(move |_, action| {
            if action.is("outer") {
                if let Some(store) = inner.upgrade() {
                    *nested_result.borrow_mut() = Some(store.dispatch(Action::of_type("inner")));
                }
            }
            json!({})
        }));
        store.dispatch(Action::of_type("outer")).unwrap();

        assert_eq!(
            nested.borrow_mut().take(),
            Some(Err(StoreError::Reducing("inner".to_string())))
        );
        assert!(!store.is_dispatching());
    }

    #[test]
    fn inspector_sees_every_action() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let table = SliceTable::empty().with("counter", counter());
        let store = Store::new(
            table.combine(),
            json!({}),
            Some(Box::new(move |action: &Action, state: &Value| {
                sink.borrow_mut().push((action.kind.clone(), state.clone()));
            })),
        );
        store.dispatch(Action::of_type("counter/increment")).unwrap();

        let log = log.borrow();
        assert_eq!(log[0].0, INIT);
        assert_eq!(log[1], ("counter/increment".to_string(), json!({ "counter": 1 })));
    }
}
