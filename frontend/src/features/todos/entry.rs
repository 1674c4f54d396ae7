//! Lifecycle of the todos feature: the host calls [`TodosEntry::init`] when
//! the feature mounts and [`TodosEntry::destroy`] when it unmounts.
//!
//! `destroy` leaves the `todosSlice` reducer registered, so the slice (and
//! its todos) outlives an unmount/remount cycle.  A load still in flight when
//! `destroy` runs is not cancelled and dispatches when it resolves.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use super::logic::{destroy_todos_logic, init_todos_logic};
use super::slice::todos_reducer;
use super::REDUCER_NAME;
use crate::bridge::GlobalBridge;
use crate::fetch::Fetcher;
use crate::store::DynamicReducer;
use crate::toast::Notifier;

/// The feature's initial data load.  The caller decides how to drive it
/// (`spawn_local` in the browser).
pub type LoadTask = Pin<Box<dyn Future<Output = ()>>>;

pub struct TodosEntry {
    bridge: Rc<GlobalBridge>,
    fetcher: Rc<dyn Fetcher>,
    notifier: Rc<dyn Notifier>,
    data_url: String,
}

impl TodosEntry {
    pub fn new(
        bridge: Rc<GlobalBridge>,
        fetcher: Rc<dyn Fetcher>,
        notifier: Rc<dyn Notifier>,
        data_url: impl Into<String>,
    ) -> Self {
        Self {
            bridge,
            fetcher,
            notifier,
            data_url: data_url.into(),
        }
    }

    /// Register the slice, then hand back the data load.
    pub fn init(&self) -> LoadTask {
        let request = DynamicReducer::new(REDUCER_NAME, todos_reducer());
        match self.bridge.get_globals().try_add_dynamic_reducer(request) {
            Some(true) => log::debug!("`{}` registered", REDUCER_NAME),
            Some(false) => log::debug!("`{}` already registered", REDUCER_NAME),
            None => log::warn!("host provides no addDynamicReducer; `{}` not registered", REDUCER_NAME),
        }

        Box::pin(init_todos_logic(
            Rc::clone(&self.bridge),
            Rc::clone(&self.fetcher),
            Rc::clone(&self.notifier),
            self.data_url.clone(),
        ))
    }

    pub fn destroy(&self) {
        destroy_todos_logic();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::install_host_capabilities;
    use crate::components::GlobalComponents;
    use crate::constants::DEMO_TODOS_PATH;
    use crate::features::todos::selectors::get_todos;
    use crate::fetch::testing::StubFetcher;
    use crate::host::Host;
    use crate::store::{ReducerRegistry, StoreOptions};
    use crate::toast::testing::RecordingNotifier;
    use crate::toast::ToastKind;
    use futures::executor::block_on;
    use serde_json::json;

    const BUY_MILK: &str = r#"{ "todos": [{ "id": 7, "title": "Buy milk", "completed": false }] }"#;

    struct Harness {
        registry: Rc<ReducerRegistry>,
        notifier: Rc<RecordingNotifier>,
        entry: TodosEntry,
    }

    fn harness(response: Result<&str, &str>) -> Harness {
        let registry = Rc::new(ReducerRegistry::new());
        registry.init_store(json!({}), &StoreOptions { devtools: false });
        let host = Host::new(Rc::clone(&registry), Rc::new(GlobalComponents::new()));
        let bridge = Rc::new(GlobalBridge::new());
        install_host_capabilities(&bridge, host.capabilities());

        let notifier = Rc::new(RecordingNotifier::default());
        let fetcher = Rc::new(StubFetcher::with(DEMO_TODOS_PATH, response));
        let entry = TodosEntry::new(bridge, fetcher, notifier.clone(), DEMO_TODOS_PATH);
        Harness {
            registry,
            notifier,
            entry,
        }
    }

    fn titles(registry: &ReducerRegistry) -> Vec<String> {
        let state = registry.get_state().unwrap_or_default();
        get_todos(&state).into_iter().map(|t| t.title).collect()
    }

    #[test]
    fn init_registers_the_slice_before_the_load_resolves() {
        let h = harness(Ok(BUY_MILK));
        let load = h.entry.init();

        assert!(h.registry.contains(REDUCER_NAME));
        assert!(titles(&h.registry).is_empty());

        block_on(load);
        assert_eq!(titles(&h.registry), vec!["Buy milk"]);
        assert!(h.notifier.seen.borrow().is_empty());
    }

    #[test]
    fn failed_load_raises_one_error_and_adds_nothing() {
        let h = harness(Err("NetworkError when attempting to fetch resource."));
        block_on(h.entry.init());

        let errors = h.notifier.of_kind(ToastKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error fetching todos:  "));
        assert_eq!(h.notifier.seen.borrow().len(), 1);
        assert!(titles(&h.registry).is_empty());
    }

    #[test]
    fn malformed_document_is_reported_like_a_failed_fetch() {
        let h = harness(Ok(r#"{ "items": [] }"#));
        block_on(h.entry.init());
        assert_eq!(h.notifier.of_kind(ToastKind::Error).len(), 1);
        assert!(titles(&h.registry).is_empty());
    }

    #[test]
    fn destroy_keeps_the_reducer_registered() {
        let h = harness(Ok(BUY_MILK));
        block_on(h.entry.init());
        h.entry.destroy();

        assert!(h.registry.contains(REDUCER_NAME));
        assert_eq!(titles(&h.registry), vec!["Buy milk"]);
    }

    #[test]
    fn load_finishing_after_destroy_still_dispatches() {
        let h = harness(Ok(BUY_MILK));
        let load = h.entry.init();
        h.entry.destroy();
        block_on(load);
        assert_eq!(titles(&h.registry), vec!["Buy milk"]);
    }

    #[test]
    fn remount_keeps_existing_todos() {
        let h = harness(Ok(BUY_MILK));
        block_on(h.entry.init());
        h.entry.destroy();
        block_on(h.entry.init());

        assert_eq!(titles(&h.registry), vec!["Buy milk"]);
        assert_eq!(h.registry.slice_names(), vec![REDUCER_NAME.to_string()]);
    }

    #[test]
    fn init_without_host_capabilities_does_not_panic() {
        let notifier = Rc::new(RecordingNotifier::default());
        let entry = TodosEntry::new(
            Rc::new(GlobalBridge::new()),
            Rc::new(StubFetcher::with(DEMO_TODOS_PATH, Ok(BUY_MILK))),
            notifier.clone(),
            DEMO_TODOS_PATH,
        );
        block_on(entry.init());
        assert!(notifier.seen.borrow().is_empty());
    }
}
