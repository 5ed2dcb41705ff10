//! Backend configuration for the Supabase project that stores todos.
//!
//! Only the public anon key is read here. The anon key is safe to ship in a
//! client build; service-role keys must never be configured.

use std::env;

use crate::util::{is_http_url, normalize_text_option, parse_bool_flag};
use crate::{Error, Result};

const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_TABLE: &str = "TASKLIST_TABLE";
const ENV_IMAGE_BUCKET: &str = "TASKLIST_IMAGE_BUCKET";
const ENV_IMAGE_FOLDER: &str = "TASKLIST_IMAGE_FOLDER";
const ENV_PERSIST_IMAGE_URL: &str = "TASKLIST_PERSIST_IMAGE_URL";

pub const DEFAULT_TABLE: &str = "TodoList";
pub const DEFAULT_IMAGE_BUCKET: &str = "images";
pub const DEFAULT_IMAGE_FOLDER: &str = "todo-images";

/// What to do with the public URL of an uploaded image when inserting a todo.
///
/// `Discard` uploads and resolves as usual but inserts the row without the
/// link, for projects whose `TodoList` table has no `imageUrl` column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageUrlPolicy {
    /// Write the resolved URL into the inserted row.
    #[default]
    Persist,
    /// Resolve the URL but insert the row without it.
    Discard,
}

/// Supabase project settings used by the remote client and repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co` (no trailing slash).
    pub supabase_url: String,
    /// Public anon key sent as `apikey` and bearer token.
    pub supabase_anon_key: String,
    /// Table holding todo rows.
    pub table: String,
    /// Storage bucket for todo images.
    pub image_bucket: String,
    /// Folder inside the bucket that uploads are written to.
    pub image_folder: String,
    pub image_url_policy: ImageUrlPolicy,
}

impl BackendConfig {
    /// Build a config with default table, bucket and folder names.
    pub fn new(supabase_url: impl AsRef<str>, supabase_anon_key: impl Into<String>) -> Result<Self> {
        let supabase_url = normalize_supabase_url(supabase_url.as_ref())?;
        let supabase_anon_key = supabase_anon_key.into().trim().to_string();
        if supabase_anon_key.is_empty() {
            return Err(Error::Config(
                "Supabase anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            table: DEFAULT_TABLE.to_string(),
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
            image_folder: DEFAULT_IMAGE_FOLDER.to_string(),
            image_url_policy: ImageUrlPolicy::default(),
        })
    }

    /// Load backend configuration from environment variables.
    ///
    /// Returns `Ok(None)` when neither `SUPABASE_URL` nor `SUPABASE_ANON_KEY`
    /// is set, and an error when only part of the configuration is present.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }

    /// REST (PostgREST) endpoint root.
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }

    /// Storage endpoint root.
    #[must_use]
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.supabase_url)
    }
}

/// Trim a project URL and strip trailing slashes and API suffixes.
pub fn normalize_supabase_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::Config("Supabase URL must not be empty".to_string()));
    }
    if !is_http_url(trimmed) {
        return Err(Error::Config(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }

    let base = trimmed
        .strip_suffix("/rest/v1")
        .or_else(|| trimmed.strip_suffix("/storage/v1"))
        .unwrap_or(trimmed);
    Ok(base.to_string())
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<BackendConfig>> {
    let url = normalize_text_option(lookup(ENV_SUPABASE_URL));
    let anon_key = normalize_text_option(lookup(ENV_SUPABASE_ANON_KEY));

    let (url, anon_key) = match (url, anon_key) {
        (None, None) => return Ok(None),
        (Some(url), Some(anon_key)) => (url, anon_key),
        (None, Some(_)) => {
            return Err(Error::Config(format!(
                "Supabase configuration is incomplete. Missing: {ENV_SUPABASE_URL}"
            )))
        }
        (Some(_), None) => {
            return Err(Error::Config(format!(
                "Supabase configuration is incomplete. Missing: {ENV_SUPABASE_ANON_KEY}"
            )))
        }
    };

    let mut config = BackendConfig::new(url, anon_key)?;
    if let Some(table) = normalize_text_option(lookup(ENV_TABLE)) {
        config.table = table;
    }
    if let Some(bucket) = normalize_text_option(lookup(ENV_IMAGE_BUCKET)) {
        config.image_bucket = bucket;
    }
    if let Some(folder) = normalize_text_option(lookup(ENV_IMAGE_FOLDER)) {
        let folder = folder.trim_matches('/').to_string();
        if !folder.is_empty() {
            config.image_folder = folder;
        }
    }
    if let Some(raw) = normalize_text_option(lookup(ENV_PERSIST_IMAGE_URL)) {
        let persist = parse_bool_flag(&raw).ok_or_else(|| {
            Error::Config(format!(
                "{ENV_PERSIST_IMAGE_URL} must be true or false, got '{raw}'"
            ))
        })?;
        config.image_url_policy = if persist {
            ImageUrlPolicy::Persist
        } else {
            ImageUrlPolicy::Discard
        };
    }

    Ok(Some(config))
}
