//! Turns a [`UiNode`] tree into DOM elements under a container.

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, MouseEvent, Node};

use crate::view::UiNode;

type ClickClosure = Closure<dyn FnMut(MouseEvent)>;

pub struct DomRoot {
    container: Element,
    // Listeners of the current render; dropped when the next render lands.
    handlers: RefCell<Vec<ClickClosure>>,
}

impl DomRoot {
    pub fn new(container: Element) -> Self {
        Self {
            container,
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    /// Replace the container's content with `tree`.
    ///
    /// Must not run from inside one of this root's own click handlers, since
    /// it drops them; schedule it instead.
    pub fn render(&self, tree: &UiNode) -> Result<(), JsValue> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container is not attached to a document"))?;

        let mut handlers = Vec::new();
        let nodes = build(&document, tree, &mut handlers)?;

        self.container.set_inner_html("");
        for node in nodes {
            self.container.append_child(&node)?;
        }
        *self.handlers.borrow_mut() = handlers;
        Ok(())
    }

    pub fn clear(&self) {
        self.container.set_inner_html("");
        self.handlers.borrow_mut().clear();
    }
}

fn build(document: &Document, node: &UiNode, handlers: &mut Vec<ClickClosure>) -> Result<Vec<Node>, JsValue> {
    if node.is_fragment() {
        let mut nodes = Vec::new();
        for child in &node.children {
            nodes.extend(build(document, child, handlers)?);
        }
        return Ok(nodes);
    }

    let el = document.create_element(&node.tag)?;
    for (name, value) in &node.attrs {
        el.set_attribute(name, value)?;
    }
    if let Some(text) = &node.text {
        el.set_text_content(Some(text));
    }
    for child in &node.children {
        for built in build(document, child, handlers)? {
            el.append_child(&built)?;
        }
    }

    if node.on_click.is_some() || node.stop_propagation {
        let handler = node.on_click.clone();
        let stop = node.stop_propagation;
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            if stop {
                event.stop_propagation();
            }
            if let Some(handler) = &handler {
                handler();
            }
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        handlers.push(closure);
    }

    Ok(vec![el.into()])
}
