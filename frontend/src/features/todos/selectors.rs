//! Read side of the `todosSlice`.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::models::Todo;
use super::REDUCER_NAME;

/// `state.todosSlice.todos`, if the slice is registered.
pub fn get_todos_dictionary(state: &Value) -> Option<&Map<String, Value>> {
    state.get(REDUCER_NAME)?.get("todos")?.as_object()
}

/// The todos as a list: numeric ids first in ascending order, then the
/// remaining ids in key order (the order JS walks an object's values).
pub fn get_todos(state: &Value) -> Vec<Todo> {
    let Some(dictionary) = get_todos_dictionary(state) else {
        return Vec::new();
    };

    let mut entries: Vec<(&String, &Value)> = dictionary.iter().collect();
    entries.sort_by_key(|(key, _)| match key.parse::<u64>() {
        Ok(n) => (0, n),
        Err(_) => (1, 0),
    });

    entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value.clone()) {
            Ok(todo) => Some(todo),
            Err(e) => {
                log::warn!("ignoring unreadable todo `{}`: {}", key, e);
                None
            }
        })
        .collect()
}

/// Memoised [`get_todos`]: recomputes only when the dictionary changed
/// since the last call.
#[derive(Default)]
pub struct TodosSelector {
    last: RefCell<Option<(Option<Map<String, Value>>, Rc<Vec<Todo>>)>>,
}

impl TodosSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, state: &Value) -> Rc<Vec<Todo>> {
        let input = get_todos_dictionary(state);
        if let Some((previous, output)) = self.last.borrow().as_ref() {
            if previous.as_ref() == input {
                return Rc::clone(output);
            }
        }

        let output = Rc::new(get_todos(state));
        *self.last.borrow_mut() = Some((input.cloned(), Rc::clone(&output)));
        output
    }
}
