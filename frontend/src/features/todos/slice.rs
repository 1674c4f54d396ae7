//! `todos` slice: reducer and action creators.

use std::rc::Rc;

use serde_json::{json, Value};

use super::models::{Todo, TodoId, TodosState};
use crate::store::{reducer, Action, ActionCreator, Reducer};
use crate::utils::{array_to_object, key_of};

pub const CREATE_TODOS: &str = "todos/createTodos";
pub const DELETE_TODO_BY_ID: &str = "todos/deleteTodoById";

pub fn create_todos_action(todos: &[Todo]) -> Action {
    Action::new(CREATE_TODOS, json!({ "todos": todos }))
}

/// `createTodos` as a creator taking its raw params (`{ todos: [...] }`),
/// for seeding the slice through `add_with_default_state`.
pub fn create_todos_creator() -> ActionCreator {
    Rc::new(|params| Action::new(CREATE_TODOS, params))
}

pub fn delete_todo_by_id_action(id: TodoId) -> Action {
    Action::new(DELETE_TODO_BY_ID, json!({ "id": id }))
}

pub fn todos_reducer() -> Reducer {
    reducer(reduce)
}

pub fn reduce(state: Option<&Value>, action: &Action) -> Value {
    match action.kind.as_str() {
        CREATE_TODOS => {
            let mut todos_state = current(state);
            create_todos(&mut todos_state, &action.payload);
            to_value(&todos_state)
        }
        DELETE_TODO_BY_ID => {
            let mut todos_state = current(state);
            if let Some(key) = action.payload.get("id").and_then(key_of) {
                todos_state.todos.remove(&key);
            }
            to_value(&todos_state)
        }
        _ => match state {
            Some(value) => value.clone(),
            None => to_value(&TodosState::default()),
        },
    }
}

/// Merge the payload's todos into the dictionary, keyed by id.
fn create_todos(state: &mut TodosState, payload: &Value) {
    let items = payload
        .get("todos")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for (key, item) in array_to_object(items, "id") {
        match serde_json::from_value::<Todo>(item) {
            Ok(todo) => {
                state.todos.insert(key, todo);
            }
            Err(e) => log::warn!("skipping malformed todo `{}`: {}", key, e),
        }
    }
}

fn current(state: Option<&Value>) -> TodosState {
    match state {
        None => TodosState::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            log::warn!("todos slice state unreadable, starting over: {}", e);
            TodosState::default()
        }),
    }
}

fn to_value(state: &TodosState) -> Value {
    serde_json::to_value(state).unwrap_or_else(|e| {
        log::error!("todos slice state not serialisable: {}", e);
        json!({ "todos": {} })
    })
}
