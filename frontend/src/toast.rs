//! Tiny toast / notification helper.
//! Creates a `#toast-root` container once per page and prepends toast divs
//! that are removed again after a few seconds.
//!
//! Feature code talks to the [`Notifier`] trait; [`DomToaster`] is the
//! browser implementation.

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::constants::TOAST_DURATION_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Default,
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class_name(self) -> &'static str {
        match self {
            ToastKind::Default => "toast-default",
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
            ToastKind::Info => "toast-info",
        }
    }
}

/// Transient, non-blocking user notifications.
pub trait Notifier {
    fn notify(&self, message: &str, kind: ToastKind);

    fn show(&self, message: &str) {
        self.notify(message, ToastKind::Default);
    }

    fn success(&self, message: &str) {
        self.notify(message, ToastKind::Success);
    }

    fn error(&self, message: &str) {
        self.notify(message, ToastKind::Error);
    }

    fn info(&self, message: &str) {
        self.notify(message, ToastKind::Info);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DomToaster;

impl Notifier for DomToaster {
    fn notify(&self, message: &str, kind: ToastKind) {
        if let Err(e) = show(message, kind) {
            log::warn!("failed to show toast `{}`: {:?}", message, e);
        }
    }
}

pub fn show(message: &str, kind: ToastKind) -> Result<(), JsValue> {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return Ok(()),
    };
    let document = match window.document() {
        Some(d) => d,
        None => return Ok(()),
    };

    let root = ensure_root(&document)?;

    let toast = document.create_element("div")?;
    toast.set_class_name("toast");
    toast.class_list().add_1(kind.class_name())?;
    toast.set_text_content(Some(message));

    // Prepend so newest appears on top.
    root.prepend_with_node_1(&toast)?;

    let toast: HtmlElement = toast.unchecked_into();
    Timeout::new(TOAST_DURATION_MS, move || toast.remove()).forget();

    ensure_styles(&document)
}

fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id("toast-root") {
        return Ok(el);
    }
    let root = document.create_element("div")?;
    root.set_id("toast-root");
    root.set_class_name("toast-root");
    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&root)?;
    Ok(root)
}

fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("toast-styles").is_some() {
        return Ok(());
    }

    let css = "
.toast-root{position:fixed;top:16px;right:16px;display:flex;flex-direction:column;gap:8px;z-index:9999;font-family:Roboto,Arial,sans-serif;font-size:160%}
.toast{padding:10px 16px;border-radius:4px;color:#fff;box-shadow:0 2px 4px rgba(0,0,0,.1);opacity:0;animation:toast-in .2s forwards}
.toast-default{background:#374151}
.toast-success{background:#16a34a}
.toast-error{background:#dc2626}
.toast-info{background:#2563eb}
@keyframes toast-in{to{opacity:1}}
";

    let style = document.create_element("style")?;
    style.set_id("toast-styles");
    style.set_text_content(Some(css));
    match document.head() {
        Some(head) => head.append_child(&style)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&style)?,
    };
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Keeps every notification for assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub seen: RefCell<Vec<(ToastKind, String)>>,
    }

    impl RecordingNotifier {
        pub fn of_kind(&self, kind: ToastKind) -> Vec<String> {
            self.seen
                .borrow()
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, kind: ToastKind) {
            self.seen.borrow_mut().push((kind, message.to_string()));
        }
    }
}
