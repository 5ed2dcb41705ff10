//! Command dispatch: runs one command against the repository and publishes
//! the resulting snapshots.
//!
//! Callers feed commands through a single loop and await each `dispatch`
//! before taking the next, so only one handler touches the state at a time.

use crate::repository::TodoRepository;
use crate::state::{Command, Effect, Outcome, TodoListState};

/// Holder of the current view state snapshot.
pub trait StateStore {
    fn snapshot(&self) -> TodoListState;
    fn replace(&mut self, state: TodoListState);
}

/// Plain owned store, used by headless callers and tests.
#[derive(Clone, Debug, Default)]
pub struct LocalStore {
    state: TodoListState,
}

impl LocalStore {
    #[must_use]
    pub const fn new(state: TodoListState) -> Self {
        Self { state }
    }

    #[must_use]
    pub const fn state(&self) -> &TodoListState {
        &self.state
    }
}

impl StateStore for LocalStore {
    fn snapshot(&self) -> TodoListState {
        self.state.clone()
    }

    fn replace(&mut self, state: TodoListState) {
        self.state = state;
    }
}

/// Run an effect against the repository.
pub async fn perform<R: TodoRepository>(repository: &R, effect: Effect) -> Outcome {
    match effect {
        Effect::FetchAll => Outcome::Loaded(repository.list_all().await),
        Effect::Create { name, image } => Outcome::Created(repository.create(&name, image).await),
        Effect::SetCompleted { id, completed } => {
            let result = repository.set_completed(id.clone(), completed).await;
            Outcome::CompletionSet {
                id,
                completed,
                result,
            }
        }
        Effect::Remove { id } => {
            let result = repository.remove(id.clone()).await;
            Outcome::Removed { id, result }
        }
    }
}

/// Handle one command end to end.
///
/// The in-flight snapshot is published before the remote call; the outcome
/// is applied to whatever snapshot is current when the call returns, so local
/// edits made meanwhile (typing in the draft box) are kept.
pub async fn dispatch<R, S>(repository: &R, store: &mut S, command: Command)
where
    R: TodoRepository,
    S: StateStore,
{
    tracing::debug!("Dispatching {:?}", command);
    let (pending, effect) = store.snapshot().begin(&command);
    store.replace(pending);

    let Some(effect) = effect else {
        return;
    };
    let outcome = perform(repository, effect).await;
    let next = store.snapshot().finish(outcome);
    store.replace(next);
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{normalize_todo_name, ImageUpload, TodoId, TodoItem};
    use crate::{Error, Result};

    /// In-memory repository that records calls and can be told to fail.
    #[derive(Default)]
    struct FakeRepository {
        rows: Mutex<Vec<TodoItem>>,
        next_id: AtomicI64,
        calls: AtomicUsize,
        fail_uploads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl FakeRepository {
        fn with_rows(rows: Vec<TodoItem>) -> Self {
            let next_id = rows
                .iter()
                .filter_map(|row| match row.id {
                    TodoId::Number(raw) => Some(raw),
                    TodoId::Text(_) => None,
                })
                .max()
                .unwrap_or(0);
            Self {
                rows: Mutex::new(rows),
                next_id: AtomicI64::new(next_id),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record_call(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn check_writes(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(Error::Remote("write rejected".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl TodoRepository for FakeRepository {
        async fn list_all(&self) -> Result<Vec<TodoItem>> {
            self.record_call();
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, name: &str, image: Option<ImageUpload>) -> Result<TodoItem> {
            self.record_call();
            let name = normalize_todo_name(name)
                .ok_or_else(|| Error::InvalidInput("empty".to_string()))?;
            let image_url = match image {
                Some(_) if self.fail_uploads.load(Ordering::SeqCst) => {
                    return Err(Error::Upload("bucket unavailable".to_string()));
                }
                Some(image) => Some(format!("https://cdn.test/{}", image.file_name)),
                None => None,
            };
            self.check_writes()?;
            let item = TodoItem {
                id: TodoId::Number(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                name,
                is_completed: false,
                image_url,
            };
            self.rows.lock().unwrap().push(item.clone());
            Ok(item)
        }

        async fn set_completed(&self, id: TodoId, completed: bool) -> Result<()> {
            self.record_call();
            self.check_writes()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or_else(|| Error::Remote(format!("Todo not found: {id}")))?;
            row.is_completed = completed;
            Ok(())
        }

        async fn remove(&self, id: TodoId) -> Result<()> {
            self.record_call();
            self.check_writes()?;
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|row| row.id != id);
            if rows.len() == before {
                return Err(Error::Remote(format!("Todo not found: {id}")));
            }
            Ok(())
        }
    }

    /// Store that remembers every published `uploading` value.
    #[derive(Default)]
    struct RecordingStore {
        inner: LocalStore,
        uploading_history: Vec<bool>,
    }

    impl StateStore for RecordingStore {
        fn snapshot(&self) -> TodoListState {
            self.inner.snapshot()
        }

        fn replace(&mut self, state: TodoListState) {
            self.uploading_history.push(state.uploading);
            self.inner.replace(state);
        }
    }

    fn row(id: i64, name: &str, is_completed: bool) -> TodoItem {
        TodoItem {
            id: TodoId::Number(id),
            name: name.to_string(),
            is_completed,
            image_url: None,
        }
    }

    async fn submit(repo: &FakeRepository, store: &mut impl StateStore, name: &str) {
        let drafted = store.snapshot().with_draft_name(name);
        store.replace(drafted);
        dispatch(repo, store, Command::Submit).await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn load_replaces_items_with_remote_rows() {
        let repo = FakeRepository::with_rows(vec![row(1, "a", false), row(2, "b", true)]);
        let mut store = LocalStore::default();

        dispatch(&repo, &mut store, Command::Load).await;

        assert_eq!(store.state().items, vec![row(1, "a", false), row(2, "b", true)]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_without_file_yields_plain_item() {
        let repo = FakeRepository::default();
        let mut store = LocalStore::default();

        submit(&repo, &mut store, "Buy milk").await;

        let state = store.state();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].name, "Buy milk");
        assert!(!state.items[0].is_completed);
        assert_eq!(state.items[0].image_url, None);
        assert_eq!(state.draft_name, "");
        assert!(!state.uploading);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_with_file_links_image() {
        let repo = FakeRepository::default();
        let mut store = LocalStore::new(
            TodoListState::default().with_selected_file(ImageUpload::new("cat.png", vec![1])),
        );

        submit(&repo, &mut store, "Cat").await;

        let state = store.state();
        assert_eq!(
            state.items[0].image_url.as_deref(),
            Some("https://cdn.test/cat.png")
        );
        assert_eq!(state.selected_file, None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_name_makes_no_remote_call() {
        let repo = FakeRepository::default();
        let mut store = LocalStore::new(TodoListState::default().with_draft_name("  "));
        let before = store.snapshot();

        dispatch(&repo, &mut store, Command::Submit).await;

        assert_eq!(repo.calls(), 0);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn uploading_spans_exactly_the_submit() {
        let repo = FakeRepository::default();
        let mut store = RecordingStore::default();

        submit(&repo, &mut store, "Buy milk").await;
        // draft edit, in-flight snapshot, outcome
        assert_eq!(store.uploading_history, vec![false, true, false]);

        repo.fail_writes.store(true, Ordering::SeqCst);
        store.uploading_history.clear();
        submit(&repo, &mut store, "Fails").await;
        assert_eq!(store.uploading_history, vec![false, true, false]);
        assert!(store.snapshot().notice.is_some());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn upload_failure_adds_nothing_and_notifies() {
        let repo = FakeRepository::default();
        repo.fail_uploads.store(true, Ordering::SeqCst);
        let mut store = LocalStore::new(
            TodoListState::default().with_selected_file(ImageUpload::new("cat.png", vec![1])),
        );

        submit(&repo, &mut store, "Cat").await;

        let state = store.state();
        assert!(state.items.is_empty());
        assert!(!state.uploading);
        assert_eq!(state.draft_name, "Cat");
        assert!(state.selected_file.is_some());
        assert!(state.notice.as_deref().unwrap().contains("bucket unavailable"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn toggle_strikes_row_after_success() {
        let repo = FakeRepository::with_rows(vec![row(4, "Walk", false)]);
        let mut store = LocalStore::default();
        dispatch(&repo, &mut store, Command::Load).await;

        dispatch(&repo, &mut store, Command::Toggle(TodoId::Number(4))).await;

        assert!(store.state().items[0].is_completed);
        assert!(store.state().rows()[0].struck_through);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_delete_keeps_row() {
        let repo = FakeRepository::with_rows(vec![row(4, "Walk", false)]);
        let mut store = LocalStore::default();
        dispatch(&repo, &mut store, Command::Load).await;
        repo.fail_writes.store(true, Ordering::SeqCst);

        dispatch(&repo, &mut store, Command::Delete(TodoId::Number(4))).await;
        assert_eq!(store.state().items.len(), 1);

        repo.fail_writes.store(false, Ordering::SeqCst);
        dispatch(&repo, &mut store, Command::Delete(TodoId::Number(4))).await;
        assert!(store.state().rows().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn mixed_sequence_tracks_creates_minus_deletes() {
        let repo = FakeRepository::default();
        let mut store = LocalStore::default();

        for name in ["one", "two", "three"] {
            submit(&repo, &mut store, name).await;
        }
        let ids: Vec<TodoId> = store.state().items.iter().map(|item| item.id.clone()).collect();

        dispatch(&repo, &mut store, Command::Toggle(ids[0].clone())).await;
        dispatch(&repo, &mut store, Command::Toggle(ids[1].clone())).await;
        dispatch(&repo, &mut store, Command::Toggle(ids[0].clone())).await;
        dispatch(&repo, &mut store, Command::Delete(ids[2].clone())).await;

        let state = store.state();
        assert_eq!(state.items.len(), 3 - 1);
        assert!(!state.item(&ids[0]).unwrap().is_completed);
        assert!(state.item(&ids[1]).unwrap().is_completed);
        assert!(state.item(&ids[2]).is_none());

        // Local view matches what the store holds.
        assert_eq!(repo.rows.lock().unwrap().clone(), state.items);
    }
}
