//! Todo repository: the four todo operations plus image upload, expressed
//! against the remote table and storage bucket.

mod supabase;

use std::future::Future;

use crate::models::{ImageUpload, TodoId, TodoItem};
use crate::Result;

pub use supabase::SupabaseTodoRepository;

/// Storage operations for todo items.
///
/// Each call is one best-effort round trip: no retries, no batching.
pub trait TodoRepository {
    /// Fetch every todo in whatever order the store returns them.
    fn list_all(&self) -> impl Future<Output = Result<Vec<TodoItem>>> + Send;

    /// Create a todo, uploading the image first when one is attached.
    ///
    /// Upload failures abort the call before anything is inserted.
    fn create(
        &self,
        name: &str,
        image: Option<ImageUpload>,
    ) -> impl Future<Output = Result<TodoItem>> + Send;

    /// Set the completion flag of one todo.
    fn set_completed(
        &self,
        id: TodoId,
        completed: bool,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete one todo.
    fn remove(&self, id: TodoId) -> impl Future<Output = Result<()>> + Send;
}
