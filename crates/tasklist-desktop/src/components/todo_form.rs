//! New-todo form: name input, image picker and submit button

use dioxus::prelude::*;
use rfd::AsyncFileDialog;

use tasklist_core::state::Command;
use tasklist_core::ImageUpload;

use crate::state::AppState;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// Input form bound to the draft name and selected file.
#[component]
pub fn TodoForm() -> Element {
    let mut todos = use_context::<AppState>().todos;
    let commands = use_coroutine_handle::<Command>();
    let form = todos.read().form();

    let on_pick_image = move |_| {
        spawn(async move {
            let Some(file) = AsyncFileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };
            let file_name = file.file_name();
            if file_name.trim().is_empty() {
                tracing::warn!("Ignoring selected file with an empty name");
                return;
            }

            let bytes = file.read().await;
            tracing::debug!("Selected image {} ({} bytes)", file_name, bytes.len());
            let next = todos.peek().with_selected_file(ImageUpload::new(file_name, bytes));
            todos.set(next);
        });
    };

    let on_clear_image = move |_| {
        let next = todos.peek().without_selected_file();
        todos.set(next);
    };

    let handle_keydown = move |evt: Event<KeyboardData>| {
        if evt.key() == Key::Enter {
            commands.send(Command::Submit);
        }
    };

    let selected_label = form
        .selected_file_name
        .clone()
        .unwrap_or_else(|| "No image selected".to_string());
    let has_file = form.selected_file_name.is_some();
    let submit_bg = if form.submit_disabled {
        "#93c5fd"
    } else {
        "#2563eb"
    };

    rsx! {
        div {
            class: "todo-form",
            style: "display: flex; flex-direction: column; gap: 8px; margin-bottom: 24px;",

            input {
                r#type: "text",
                placeholder: "What needs doing?",
                value: "{form.draft_name}",
                style: "
                    width: 100%;
                    padding: 8px;
                    border: 1px solid #d1d5db;
                    border-radius: 6px;
                    box-sizing: border-box;
                ",
                oninput: move |evt| {
                    let next = todos.peek().with_draft_name(evt.value());
                    todos.set(next);
                },
                onkeydown: handle_keydown,
            }

            div {
                style: "
                    display: flex;
                    align-items: center;
                    gap: 8px;
                    padding: 8px;
                    border: 1px solid #d1d5db;
                    border-radius: 6px;
                ",

                button {
                    r#type: "button",
                    style: "padding: 4px 10px; border-radius: 4px; border: 1px solid #9ca3af; background: #f9fafb;",
                    disabled: form.submit_disabled,
                    onclick: on_pick_image,
                    "Choose image"
                }

                span {
                    style: "flex: 1; font-size: 13px; color: #4b5563; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;",
                    "{selected_label}"
                }

                if has_file {
                    button {
                        r#type: "button",
                        style: "padding: 2px 8px; border: none; background: transparent; color: #6b7280;",
                        disabled: form.submit_disabled,
                        onclick: on_clear_image,
                        "Clear"
                    }
                }
            }

            button {
                r#type: "button",
                disabled: form.submit_disabled,
                style: "
                    width: 100%;
                    padding: 8px 16px;
                    border: none;
                    border-radius: 6px;
                    color: white;
                    background: {submit_bg};
                ",
                onclick: move |_| commands.send(Command::Submit),
                "{form.submit_label}"
            }
        }
    }
}
