//! Todo row component

use dioxus::prelude::*;

use tasklist_core::state::{Command, TodoRowView};

/// A single todo with its completion and delete controls.
#[component]
pub fn TodoRow(row: TodoRowView) -> Element {
    let commands = use_coroutine_handle::<Command>();
    let toggle_id = row.id.clone();
    let delete_id = row.id.clone();

    let (bg, name_style) = if row.struck_through {
        ("#dcfce7", "text-decoration: line-through; color: #6b7280;")
    } else {
        ("#ffffff", "")
    };

    let image = row.image_url.as_ref().map(|url| {
        rsx! {
            img {
                src: "{url}",
                alt: "Todo",
                style: "margin-top: 12px; width: 100%; border-radius: 6px;",
            }
        }
    });

    rsx! {
        li {
            class: if row.struck_through { "todo-row completed" } else { "todo-row" },
            style: "
                border: 1px solid #e5e7eb;
                border-radius: 8px;
                padding: 16px;
                background: {bg};
                box-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);
            ",

            div {
                style: "display: flex; align-items: center; justify-content: space-between; gap: 8px;",

                p {
                    style: "margin: 0; font-size: 18px; {name_style}",
                    "{row.name}"
                }

                div {
                    style: "display: flex; gap: 8px;",

                    button {
                        r#type: "button",
                        style: "padding: 4px 8px; border: none; border-radius: 4px; background: #facc15; font-size: 13px;",
                        onclick: move |_| commands.send(Command::Toggle(toggle_id.clone())),
                        "{row.toggle_label}"
                    }

                    button {
                        r#type: "button",
                        style: "padding: 4px 8px; border: none; border-radius: 4px; background: #ef4444; color: white; font-size: 13px;",
                        onclick: move |_| commands.send(Command::Delete(delete_id.clone())),
                        "Delete"
                    }
                }
            }

            {image}
        }
    }
}
