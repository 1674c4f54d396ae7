use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::number_key;

/// Todo ids come from JSON as either numbers (integral or not) or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(Number),
    Text(String),
}

impl TodoId {
    /// The key the todo is stored under in the slice's `todos` object.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => f.write_str(&number_key(n)),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TodoId {
    fn from(id: i64) -> Self {
        TodoId::Number(id.into())
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        TodoId::Text(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodosState {
    #[serde(default)]
    pub todos: BTreeMap<String, Todo>,
    #[serde(
        rename = "selectedTodoId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_todo_id: Option<TodoId>,
}

/// Shape of `assets/demoTodos.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TodosDocument {
    pub todos: Vec<Todo>,
}
