//! Global components: UI pieces a micro-frontend asks the host to render next
//! to the app root (floating buttons, overlays, ...), keyed by a unique id.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::toast::Notifier;
use crate::view::UiNode;

/// Builds the component's view each time the host renders.
pub type ComponentFactory = Rc<dyn Fn() -> UiNode>;

#[derive(Default)]
pub struct GlobalComponents {
    order: RefCell<Vec<String>>,
    factories: RefCell<HashMap<String, ComponentFactory>>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl GlobalComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every add/remove so the host can re-render.
    pub fn set_on_change(&self, listener: Rc<dyn Fn()>) {
        *self.on_change.borrow_mut() = Some(listener);
    }

    /// Add `factory` under `id`.  An existing id is replaced and moves to the
    /// end of the render order.
    pub fn add(&self, id: &str, factory: ComponentFactory) {
        self.factories.borrow_mut().insert(id.to_string(), factory);
        {
            let mut order = self.order.borrow_mut();
            order.retain(|existing| existing != id);
            order.push(id.to_string());
        }
        self.changed();
    }

    pub fn remove_by_id(&self, id: &str) -> bool {
        let removed = self.factories.borrow_mut().remove(id).is_some();
        self.order.borrow_mut().retain(|existing| existing != id);
        if removed {
            self.changed();
        }
        removed
    }

    pub fn ids(&self) -> Vec<String> {
        self.order.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.order.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.borrow().is_empty()
    }

    /// Build every component in render order.
    pub fn render(&self) -> Vec<UiNode> {
        // Collect first: a factory may itself add or remove components.
        let factories: Vec<(String, ComponentFactory)> = {
            let factories = self.factories.borrow();
            self.order
                .borrow()
                .iter()
                .filter_map(|id| factories.get(id).map(|f| (id.clone(), Rc::clone(f))))
                .collect()
        };
        factories
            .into_iter()
            .map(|(id, factory)| factory().attr("data-global-component", id))
            .collect()
    }

    fn changed(&self) {
        let listener = self.on_change.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

/// Floating action button.
pub fn external_fab(label: Option<&str>, color: Option<&str>) -> UiNode {
    let fab = UiNode::new("button").class("fab").child(
        UiNode::new("span")
            .class("fab-label")
            .text(label.unwrap_or("?")),
    );
    match color {
        Some(color) => fab.attr("style", format!("background-color:{}", color)),
        None => fab,
    }
}

/// A tooltip'd fab that greets the user.
pub fn external_action(notifier: Rc<dyn Notifier>) -> ComponentFactory {
    Rc::new(move || {
        let notifier = Rc::clone(&notifier);
        external_fab(Some("M"), None)
            .attr("title", "i'm a tooltip")
            .on_click(move || notifier.show("Hello"))
    })
}
