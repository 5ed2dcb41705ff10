//! Main application component

use dioxus::prelude::*;
use futures_util::StreamExt;
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};

use tasklist_core::session::dispatch;
use tasklist_core::state::{Command, TodoListState};

use crate::components::{TodoForm, TodoList};
use crate::services::connect_backend;
use crate::state::{AppState, SignalStore};

/// Root application component
#[component]
pub fn App() -> Element {
    let mut todos = use_signal(TodoListState::default);
    let mut notice_open = use_signal(|| false);
    let backend = use_hook(connect_backend);

    // Single command loop: each command finishes before the next one starts.
    let loop_backend = backend.clone().ok();
    use_coroutine(move |mut commands: UnboundedReceiver<Command>| {
        let repository = loop_backend.clone();
        async move {
            let Some(repository) = repository else {
                return;
            };
            let mut store = SignalStore::new(todos);
            dispatch(&repository, &mut store, Command::Load).await;
            while let Some(command) = commands.next().await {
                dispatch(&repository, &mut store, command).await;
            }
        }
    });

    // Blocking notification for failed submits
    use_effect(move || {
        let Some(message) = todos.read().notice.clone() else {
            return;
        };
        if *notice_open.peek() {
            return;
        }
        notice_open.set(true);
        spawn(async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("Tasklist")
                .set_description(message)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await;
            let next = todos.peek().dismiss_notice();
            todos.set(next);
            notice_open.set(false);
        });
    });

    use_context_provider(|| AppState { todos });

    let body = match &backend {
        Ok(_) => rsx! {
            TodoForm {}
            TodoList {}
        },
        Err(message) => rsx! {
            div {
                class: "backend-error",
                style: "
                    padding: 16px;
                    border: 1px solid #fca5a5;
                    border-radius: 8px;
                    background: #fef2f2;
                    color: #991b1b;
                ",
                "{message}"
            }
        },
    };

    rsx! {
        div {
            class: "app-container",
            style: "
                max-width: 36rem;
                margin: 0 auto;
                padding: 16px;
                font-family: system-ui, -apple-system, sans-serif;
                color: #111827;
            ",

            h1 {
                style: "font-size: 28px; font-weight: 700; margin: 0 0 16px 0; text-align: center;",
                "Todo List"
            }

            {body}
        }
    }
}
