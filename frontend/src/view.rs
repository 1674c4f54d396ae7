//! A small retained view tree.
//!
//! View functions build [`UiNode`] trees from state; `dom::DomRoot` turns a
//! tree into real elements.  Keeping the tree plain Rust lets views be
//! inspected (and clicked) in host-target tests.

use std::fmt;
use std::rc::Rc;

pub type ClickHandler = Rc<dyn Fn()>;

#[derive(Clone, Default)]
pub struct UiNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<UiNode>,
    pub on_click: Option<ClickHandler>,
    /// Keep the click from reaching ancestor handlers.
    pub stop_propagation: bool,
}

impl UiNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// A fragment renders only its children.
    pub fn fragment(children: impl IntoIterator<Item = UiNode>) -> Self {
        Self::default().children(children)
    }

    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn class(self, class_name: &str) -> Self {
        self.attr("class", class_name)
    }

    pub fn test_id(self, id: &str) -> Self {
        self.attr("data-testid", id)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: UiNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = UiNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn on_click(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    pub fn stop_propagation(mut self) -> Self {
        self.stop_propagation = true;
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Depth-first search, this node included.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&UiNode) -> bool) -> Vec<&'a UiNode> {
        let mut found = Vec::new();
        self.collect(pred, &mut found);
        found
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&UiNode) -> bool, found: &mut Vec<&'a UiNode>) {
        if pred(self) {
            found.push(self);
        }
        for child in &self.children {
            child.collect(pred, found);
        }
    }

    pub fn find_by_test_id(&self, id: &str) -> Vec<&UiNode> {
        self.find_all(&|node| node.get_attr("data-testid") == Some(id))
    }

    /// Run the click handler, as a user click on this node would.
    pub fn click(&self) -> bool {
        match &self.on_click {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for UiNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiNode")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("text", &self.text)
            .field("children", &self.children)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}
