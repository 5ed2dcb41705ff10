//! Supabase implementation of `TodoRepository`

use serde_json::Value;

use super::TodoRepository;
use crate::config::{BackendConfig, ImageUrlPolicy};
use crate::models::{normalize_todo_name, storage_path_for, ImageUpload, NewTodo, TodoId, TodoItem};
use crate::remote::SupabaseClient;
use crate::util::unix_timestamp_millis;
use crate::{Error, Result};

/// Todo repository backed by a Supabase table and storage bucket.
#[derive(Clone, Debug)]
pub struct SupabaseTodoRepository {
    client: SupabaseClient,
    table: String,
    image_bucket: String,
    image_folder: String,
    image_url_policy: ImageUrlPolicy,
}

impl SupabaseTodoRepository {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self::with_client(config, SupabaseClient::new(config)?))
    }

    pub fn with_client(config: &BackendConfig, client: SupabaseClient) -> Self {
        Self {
            client,
            table: config.table.clone(),
            image_bucket: config.image_bucket.clone(),
            image_folder: config.image_folder.clone(),
            image_url_policy: config.image_url_policy,
        }
    }

    /// Upload the image and return `(object_path, public_url)`.
    async fn upload_image(&self, image: ImageUpload) -> Result<(String, String)> {
        let path = storage_path_for(&self.image_folder, &image.file_name, unix_timestamp_millis());
        let content_type = image.content_type_or_default().to_string();
        tracing::debug!(
            "Uploading {} ({} bytes) to {}/{}",
            image.file_name,
            image.len(),
            self.image_bucket,
            path
        );

        self.client
            .upload_object(&self.image_bucket, &path, image.bytes, &content_type)
            .await?;
        let public_url = self.client.public_object_url(&self.image_bucket, &path)?;
        Ok((path, public_url))
    }

    /// Insert payload for a new todo, applying the image URL policy to an
    /// uploaded `(object_path, public_url)` pair.
    fn insert_row(&self, name: String, uploaded: Option<&(String, String)>) -> NewTodo {
        let image_url = match (self.image_url_policy, uploaded) {
            (ImageUrlPolicy::Persist, Some((_, url))) => Some(url.clone()),
            (ImageUrlPolicy::Discard, Some((path, _))) => {
                tracing::warn!(
                    "Image URL persistence is disabled; {} is stored but not linked",
                    path
                );
                None
            }
            (_, None) => None,
        };
        NewTodo::new(name, image_url)
    }
}

impl TodoRepository for SupabaseTodoRepository {
    async fn list_all(&self) -> Result<Vec<TodoItem>> {
        let items: Vec<TodoItem> = self.client.select_all(&self.table).await?;
        tracing::debug!("Fetched {} todos from {}", items.len(), self.table);
        Ok(items)
    }

    async fn create(&self, name: &str, image: Option<ImageUpload>) -> Result<TodoItem> {
        let name = normalize_todo_name(name)
            .ok_or_else(|| Error::InvalidInput("Todo name cannot be empty".to_string()))?;

        let uploaded = match image {
            Some(image) => Some(self.upload_image(image).await?),
            None => None,
        };

        let row = self.insert_row(name, uploaded.as_ref());
        match self.client.insert_one::<_, TodoItem>(&self.table, &row).await {
            Ok(item) => {
                tracing::info!("Created todo {}", item.id);
                Ok(item)
            }
            Err(error) => {
                if let Some((path, _)) = uploaded {
                    tracing::warn!(
                        "Insert failed after upload; object {}/{} is orphaned",
                        self.image_bucket,
                        path
                    );
                }
                Err(error)
            }
        }
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<()> {
        let patch = serde_json::json!({ "isCompleted": completed });
        let updated: Vec<Value> = self.client.update_by_id(&self.table, &id, &patch).await?;
        if updated.is_empty() {
            return Err(Error::Remote(format!("Todo not found: {id}")));
        }
        Ok(())
    }

    async fn remove(&self, id: TodoId) -> Result<()> {
        let deleted: Vec<Value> = self.client.delete_by_id(&self.table, &id).await?;
        if deleted.is_empty() {
            return Err(Error::Remote(format!("Todo not found: {id}")));
        }
        Ok(())
    }
}
