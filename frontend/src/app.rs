// frontend/src/app.rs
//
// The Todos app shell: mounts the todos feature and renders the list from the
// store through the bridge.
//
use std::rc::Rc;

use serde_json::Value;

use crate::bridge::GlobalBridge;
use crate::config::AppConfig;
use crate::constants::{APP_READY_MESSAGE, CREATE_TODO_CLICKED_MESSAGE, DEMO_TODOS_PATH};
use crate::features::todos::components::todo_list_item;
use crate::features::todos::entry::LoadTask;
use crate::features::todos::logic::delete_todo_by_id;
use crate::features::todos::selectors::TodosSelector;
use crate::features::todos::{Todo, TodosEntry};
use crate::fetch::Fetcher;
use crate::toast::Notifier;
use crate::view::UiNode;

pub struct App {
    bridge: Rc<GlobalBridge>,
    notifier: Rc<dyn Notifier>,
    todos: TodosEntry,
    selector: TodosSelector,
}

impl App {
    pub fn new(
        bridge: Rc<GlobalBridge>,
        fetcher: Rc<dyn Fetcher>,
        notifier: Rc<dyn Notifier>,
        config: &AppConfig,
    ) -> Self {
        let todos = TodosEntry::new(
            Rc::clone(&bridge),
            fetcher,
            Rc::clone(&notifier),
            config.asset_url(DEMO_TODOS_PATH),
        );
        Self {
            bridge,
            notifier,
            todos,
            selector: TodosSelector::new(),
        }
    }

    /// Mount: greet the user and start the todos feature.
    pub fn mount(&self) -> LoadTask {
        self.notifier.show(APP_READY_MESSAGE);
        self.todos.init()
    }

    pub fn unmount(&self) {
        self.todos.destroy();
    }

    pub fn view(&self) -> UiNode {
        let state = self
            .bridge
            .get_globals()
            .try_get_state()
            .unwrap_or(Value::Null);
        let todos = self.selector.select(&state);
        app_view(&todos, &self.bridge, &self.notifier)
    }
}

fn app_view(todos: &[Todo], bridge: &Rc<GlobalBridge>, notifier: &Rc<dyn Notifier>) -> UiNode {
    let create_button = {
        let notifier = Rc::clone(notifier);
        UiNode::new("button")
            .class("button-outlined")
            .test_id("create-todo")
            .text("Create a new Todo")
            .on_click(move || notifier.success(CREATE_TODO_CLICKED_MESSAGE))
    };

    let items = todos.iter().map(|todo| {
        let bridge = Rc::clone(bridge);
        let id = todo.id.clone();
        todo_list_item(
            &todo.title,
            None,
            Some(Rc::new(move || delete_todo_by_id(&bridge, id.clone()))),
        )
        .attr("data-key", todo.id.key())
    });

    UiNode::new("div")
        .test_id("main-app")
        .attr("style", "width:100%;height:100%")
        .child(app_bar())
        .child(UiNode::new("h1").class("typography-h1").text("Todos"))
        .child(create_button)
        .children(items)
}

fn app_bar() -> UiNode {
    UiNode::new("header").class("app-bar").child(
        UiNode::new("div")
            .class("toolbar")
            .child(UiNode::new("button").class("icon-button menu").attr("aria-label", "menu"))
            .child(
                UiNode::new("div")
                    .class("brand")
                    .child(
                        UiNode::new("img")
                            .attr("src", "assets/images/logo-blue.png")
                            .attr("alt", "")
                            .class("logo"),
                    )
                    .child(UiNode::new("h5").class("typography-h5").text("Todos App")),
            )
            .child(
                UiNode::new("button")
                    .class("icon-button account")
                    .attr("aria-label", "account"),
            ),
    )
}
