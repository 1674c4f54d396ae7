use crate::view::{ClickHandler, UiNode};

pub const TODO_LIST_ITEM_TEST_ID: &str = "todo-list-item";

/// One todo row: its label and a delete button.  Clicking the button does not
/// trigger the row's own click handler.
pub fn todo_list_item(
    label: &str,
    on_click: Option<ClickHandler>,
    on_delete_click: Option<ClickHandler>,
) -> UiNode {
    let mut delete = UiNode::new("button")
        .class("icon-button")
        .attr("aria-label", "delete")
        .child(UiNode::new("span").class("icon-delete"))
        .stop_propagation();
    delete.on_click = on_delete_click;

    let mut row = UiNode::new("div")
        .class("todo-list-item")
        .test_id(TODO_LIST_ITEM_TEST_ID)
        .child(UiNode::new("p").class("todo-label").text(label))
        .child(delete);
    row.on_click = on_click;
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn delete_button_runs_only_the_delete_handler() {
        let row_clicks = Rc::new(Cell::new(0));
        let deletes = Rc::new(Cell::new(0));
        let (r, d) = (Rc::clone(&row_clicks), Rc::clone(&deletes));

        let item = todo_list_item(
            "Buy milk",
            Some(Rc::new(move || r.set(r.get() + 1))),
            Some(Rc::new(move || d.set(d.get() + 1))),
        );
        assert_eq!(item.text_content(), "Buy milk");

        let buttons = item.find_all(&|n| n.tag == "button");
        let button = buttons[0];
        assert!(button.stop_propagation);
        button.click();
        assert_eq!((row_clicks.get(), deletes.get()), (0, 1));
    }
}
