//! Data models for Tasklist

mod image;
mod todo;

pub use image::{storage_path_for, ImageUpload};
pub use todo::{normalize_todo_name, NewTodo, TodoId, TodoItem};
