//! Todo model

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a todo row.
///
/// Tables keyed by `bigint` return numbers and tables keyed by `uuid` or
/// `text` return strings; both are kept as-is and echoed back in filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(raw) => write!(f, "{raw}"),
            Self::Text(raw) => f.write_str(raw),
        }
    }
}

/// A todo row as stored in the remote table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier, assigned by the database
    pub id: TodoId,
    /// Display text, never empty
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
    /// Public URL of the attached image, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl TodoItem {
    /// Whether the item carries a displayable image link.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

/// Insert payload for a new todo row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub name: String,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewTodo {
    /// A not-yet-completed todo with an optional image link.
    #[must_use]
    pub fn new(name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            is_completed: false,
            image_url,
        }
    }
}

/// Trim a todo name, rejecting names that are empty after trimming.
#[must_use]
pub fn normalize_todo_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
