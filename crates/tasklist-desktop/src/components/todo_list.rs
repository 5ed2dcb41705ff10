//! Todo list component

use dioxus::prelude::*;

use super::TodoRow;
use crate::state::AppState;

/// All todos, in insertion order
#[component]
pub fn TodoList() -> Element {
    let state = use_context::<AppState>();
    let rows = (state.todos)().rows();

    rsx! {
        ul {
            class: "todo-list",
            style: "list-style: none; margin: 0; padding: 0; display: flex; flex-direction: column; gap: 16px;",

            if rows.is_empty() {
                li {
                    style: "padding: 20px; text-align: center; color: #9ca3af;",
                    "No todos yet"
                }
            } else {
                for row in rows {
                    {
                        let key = row.id.to_string();
                        rsx! {
                            TodoRow { key: "{key}", row }
                        }
                    }
                }
            }
        }
    }
}
