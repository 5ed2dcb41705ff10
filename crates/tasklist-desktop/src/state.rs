//! Application state management
//!
//! Shared state accessible via Dioxus context providers.

use dioxus::prelude::*;

use tasklist_core::session::StateStore;
use tasklist_core::state::TodoListState;

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Current todo board snapshot
    pub todos: Signal<TodoListState>,
}

/// Lets the command loop publish snapshots straight into the signal.
#[derive(Clone, Copy)]
pub struct SignalStore {
    todos: Signal<TodoListState>,
}

impl SignalStore {
    pub const fn new(todos: Signal<TodoListState>) -> Self {
        Self { todos }
    }
}

impl StateStore for SignalStore {
    fn snapshot(&self) -> TodoListState {
        // peek: the command loop must not subscribe to its own writes
        self.todos.peek().clone()
    }

    fn replace(&mut self, state: TodoListState) {
        self.todos.set(state);
    }
}
