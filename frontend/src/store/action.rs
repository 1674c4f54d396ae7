// frontend/src/store/action.rs
//
// Actions are plain `{ type, payload }` records so they can cross the JS
// boundary unchanged.  Slice actions are named `<slice>/<caseReducer>`.
//
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

/// Dispatching this action wipes every slice before the combined reducer runs.
pub const USER_LOGOUT: &str = "USER_LOGOUT";

/// Internal action dispatched once when a store is created.
pub const INIT: &str = "@@redux/INIT";

/// Internal action dispatched every time the store's reducer is swapped.
pub const REPLACE: &str = "@@redux/REPLACE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// An action without payload.
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self::new(kind, Value::Null)
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// Builds an action from its parameters, e.g. `createTodos({ todos })`.
pub type ActionCreator = Rc<dyn Fn(Value) -> Action>;

pub fn user_logout() -> Action {
    Action::of_type(USER_LOGOUT)
}
