//! Side-effecting todos logic: loading the demo data and dispatching through
//! the bridge.

use std::rc::Rc;

use super::models::{Todo, TodoId, TodosDocument};
use super::slice::{create_todos_action, delete_todo_by_id_action};
use crate::bridge::GlobalBridge;
use crate::fetch::{get_json, FetchError, Fetcher};
use crate::toast::Notifier;

pub fn create_todos(bridge: &GlobalBridge, todos: &[Todo]) {
    bridge.get_globals().try_dispatch(create_todos_action(todos));
}

pub fn delete_todo_by_id(bridge: &GlobalBridge, id: TodoId) {
    bridge.get_globals().try_dispatch(delete_todo_by_id_action(id));
}

pub async fn fetch_todos(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<Todo>, FetchError> {
    let document: TodosDocument = get_json(fetcher, url).await?;
    Ok(document.todos)
}

/// Load the todos from `url` into the slice.  A failed load only raises an
/// error toast; the slice keeps whatever it had.
pub async fn init_todos_logic(
    bridge: Rc<GlobalBridge>,
    fetcher: Rc<dyn Fetcher>,
    notifier: Rc<dyn Notifier>,
    url: String,
) {
    match fetch_todos(fetcher.as_ref(), &url).await {
        Ok(todos) => {
            log::debug!("loaded {} todos from {}", todos.len(), url);
            create_todos(&bridge, &todos);
        }
        Err(e) => notifier.error(&format!("Error fetching todos:  {}", e)),
    }
}

pub fn destroy_todos_logic() {
    // Nothing long-lived is started yet (no sockets, no timers).
    log::debug!("todos logic destroyed");
}
