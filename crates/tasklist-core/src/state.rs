//! View state for the todo board.
//!
//! `TodoListState` is an owned snapshot. Every update takes `&self` and
//! returns the next snapshot. Remote work is described by an [`Effect`] and
//! its result fed back as an [`Outcome`]; local items only change once the
//! remote side has acknowledged the mutation.

use crate::models::{normalize_todo_name, ImageUpload, TodoId, TodoItem};
use crate::Result;

pub const SUBMIT_LABEL_IDLE: &str = "Add todo";
pub const SUBMIT_LABEL_UPLOADING: &str = "Uploading...";

/// User actions that need the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replace the list with the remote contents.
    Load,
    /// Create a todo from the draft name and selected file.
    Submit,
    /// Flip the completion flag of a todo.
    Toggle(TodoId),
    Delete(TodoId),
}

/// Remote work requested by a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    FetchAll,
    Create {
        name: String,
        image: Option<ImageUpload>,
    },
    SetCompleted {
        id: TodoId,
        completed: bool,
    },
    Remove {
        id: TodoId,
    },
}

/// Result of performing an [`Effect`].
#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<TodoItem>>),
    Created(Result<TodoItem>),
    CompletionSet {
        id: TodoId,
        completed: bool,
        result: Result<()>,
    },
    Removed {
        id: TodoId,
        result: Result<()>,
    },
}

/// Everything the board renders from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListState {
    /// Todos in insertion order
    pub items: Vec<TodoItem>,
    /// Text of the new-todo input
    pub draft_name: String,
    /// Image picked for the next todo
    pub selected_file: Option<ImageUpload>,
    /// True while a submit is in flight
    pub uploading: bool,
    /// Message the user must acknowledge (failed submit)
    pub notice: Option<String>,
}

/// Render data for one todo row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoRowView {
    pub id: TodoId,
    pub name: String,
    pub struck_through: bool,
    pub toggle_label: &'static str,
    pub image_url: Option<String>,
}

/// Render data for the new-todo form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoFormView {
    pub draft_name: String,
    pub selected_file_name: Option<String>,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
}

impl TodoListState {
    #[must_use]
    pub fn with_draft_name(&self, draft_name: impl Into<String>) -> Self {
        Self {
            draft_name: draft_name.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_selected_file(&self, file: ImageUpload) -> Self {
        Self {
            selected_file: Some(file),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn without_selected_file(&self) -> Self {
        Self {
            selected_file: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn dismiss_notice(&self) -> Self {
        Self {
            notice: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn item(&self, id: &TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Start handling a command.
    ///
    /// Returns the snapshot to publish while the effect runs, and the effect
    /// itself. `None` means the command was a no-op.
    #[must_use]
    pub fn begin(&self, command: &Command) -> (Self, Option<Effect>) {
        match command {
            Command::Load => (self.clone(), Some(Effect::FetchAll)),
            Command::Submit => {
                if self.uploading {
                    return (self.clone(), None);
                }
                let Some(name) = normalize_todo_name(&self.draft_name) else {
                    return (self.clone(), None);
                };
                let next = Self {
                    uploading: true,
                    notice: None,
                    ..self.clone()
                };
                let effect = Effect::Create {
                    name,
                    image: self.selected_file.clone(),
                };
                (next, Some(effect))
            }
            Command::Toggle(id) => match self.item(id) {
                Some(item) => (
                    self.clone(),
                    Some(Effect::SetCompleted {
                        id: id.clone(),
                        completed: !item.is_completed,
                    }),
                ),
                None => {
                    tracing::warn!("Ignoring toggle for unknown todo {}", id);
                    (self.clone(), None)
                }
            },
            Command::Delete(id) => {
                if self.item(id).is_some() {
                    (self.clone(), Some(Effect::Remove { id: id.clone() }))
                } else {
                    tracing::warn!("Ignoring delete for unknown todo {}", id);
                    (self.clone(), None)
                }
            }
        }
    }

    /// Apply the result of an effect.
    #[must_use]
    pub fn finish(&self, outcome: Outcome) -> Self {
        let mut next = self.clone();
        match outcome {
            Outcome::Loaded(Ok(items)) => {
                tracing::info!("Loaded {} todos", items.len());
                next.items = items;
            }
            Outcome::Loaded(Err(error)) => {
                tracing::error!("Failed to fetch todos: {}", error);
            }
            Outcome::Created(result) => {
                next.uploading = false;
                match result {
                    Ok(item) => {
                        match next.items.iter_mut().find(|existing| existing.id == item.id) {
                            Some(existing) => *existing = item,
                            None => next.items.push(item),
                        }
                        next.draft_name.clear();
                        next.selected_file = None;
                    }
                    Err(error) => {
                        tracing::error!("Failed to add todo: {}", error);
                        next.notice = Some(format!("Failed to add todo: {error}"));
                    }
                }
            }
            Outcome::CompletionSet {
                id,
                completed,
                result,
            } => match result {
                Ok(()) => {
                    if let Some(item) = next.items.iter_mut().find(|item| item.id == id) {
                        item.is_completed = completed;
                    }
                }
                Err(error) => tracing::error!("Failed to update todo {}: {}", id, error),
            },
            Outcome::Removed { id, result } => match result {
                Ok(()) => next.items.retain(|item| item.id != id),
                Err(error) => tracing::error!("Failed to delete todo {}: {}", id, error),
            },
        }
        next
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> Vec<TodoRowView> {
        self.items
            .iter()
            .map(|item| TodoRowView {
                id: item.id.clone(),
                name: item.name.clone(),
                struck_through: item.is_completed,
                toggle_label: if item.is_completed { "Undo" } else { "Done" },
                image_url: if item.has_image() {
                    item.image_url.clone()
                } else {
                    None
                },
            })
            .collect()
    }

    #[must_use]
    pub fn form(&self) -> TodoFormView {
        TodoFormView {
            draft_name: self.draft_name.clone(),
            selected_file_name: self
                .selected_file
                .as_ref()
                .map(|file| file.file_name.clone()),
            submit_label: if self.uploading {
                SUBMIT_LABEL_UPLOADING
            } else {
                SUBMIT_LABEL_IDLE
            },
            submit_disabled: self.uploading,
        }
    }
}
