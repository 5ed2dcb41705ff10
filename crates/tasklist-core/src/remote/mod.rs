//! Thin Supabase REST and storage client.
//!
//! Covers the handful of PostgREST and storage calls the todo repository
//! needs. Every request is authenticated with the project's anon key.

use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::util::compact_text;
use crate::{Error, Result};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Which half of the backend a request talks to; decides the error variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Surface {
    Database,
    Storage,
}

impl Surface {
    fn error(self, message: String) -> Error {
        match self {
            Self::Database => Error::Remote(message),
            Self::Storage => Error::Upload(message),
        }
    }
}

/// Configured handle to a Supabase project.
#[derive(Clone)]
pub struct SupabaseClient {
    rest_url: String,
    storage_url: String,
    anon_key: String,
    client: Client,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SupabaseClient")
            .field("rest_url", &self.rest_url)
            .field("storage_url", &self.storage_url)
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|error| Error::Config(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self::with_client(config, client))
    }

    /// Reuse an existing `reqwest::Client` (shares its connection pool).
    pub fn with_client(config: &BackendConfig, client: Client) -> Self {
        Self {
            rest_url: config.rest_url(),
            storage_url: config.storage_url(),
            anon_key: config.supabase_anon_key.clone(),
            client,
        }
    }

    /// `GET /rest/v1/{table}?select=*`
    pub async fn select_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let request = self.select_all_request(table);
        send_json(request, Surface::Database, "select").await
    }

    /// Insert one row and return its stored representation.
    pub async fn insert_one<B, T>(&self, table: &str, row: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.insert_one_request(table, row)?;
        send_json(request, Surface::Database, "insert").await
    }

    /// Patch the row with the given id. Returns the updated rows, which is
    /// empty when no row matched.
    pub async fn update_by_id<B, T>(
        &self,
        table: &str,
        id: impl fmt::Display,
        patch: &B,
    ) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.update_by_id_request(table, id, patch)?;
        send_json(request, Surface::Database, "update").await
    }

    /// Delete the row with the given id. Returns the deleted rows.
    pub async fn delete_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: impl fmt::Display,
    ) -> Result<Vec<T>> {
        let request = self.delete_by_id_request(table, id);
        send_json(request, Surface::Database, "delete").await
    }

    /// Upload raw bytes to `bucket/path`. Existing objects are not overwritten.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let request = self.upload_object_request(bucket, path, bytes, content_type)?;
        send_checked(request, Surface::Storage, "upload").await?;
        Ok(())
    }

    /// Public link for an object in a public bucket. No request is made.
    pub fn public_object_url(&self, bucket: &str, path: &str) -> Result<String> {
        let object = encode_object_path(bucket, path)?;
        Ok(format!("{}/object/public/{object}", self.storage_url))
    }

    fn select_all_request(&self, table: &str) -> RequestBuilder {
        self.authorized(self.client.get(self.table_url(table)))
            .query(&[("select", "*")])
            .header(ACCEPT, "application/json")
    }

    fn insert_one_request<B: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<RequestBuilder> {
        let body = serde_json::to_vec(row)?;
        Ok(self
            .authorized(self.client.post(self.table_url(table)))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .body(body))
    }

    fn update_by_id_request<B: Serialize + ?Sized>(
        &self,
        table: &str,
        id: impl fmt::Display,
        patch: &B,
    ) -> Result<RequestBuilder> {
        let body = serde_json::to_vec(patch)?;
        Ok(self
            .authorized(self.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header("Prefer", RETURN_REPRESENTATION)
            .body(body))
    }

    fn delete_by_id_request(&self, table: &str, id: impl fmt::Display) -> RequestBuilder {
        self.authorized(self.client.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header(ACCEPT, "application/json")
            .header("Prefer", RETURN_REPRESENTATION)
    }

    fn upload_object_request(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<RequestBuilder> {
        let object = encode_object_path(bucket, path)?;
        Ok(self
            .authorized(
                self.client
                    .post(format!("{}/object/{object}", self.storage_url)),
            )
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, urlencoding::encode(table.trim()))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

/// Send a request and return the response body, mapping failures to the
/// surface's error variant.
async fn send_checked(request: RequestBuilder, surface: Surface, operation: &str) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|error| surface.error(format!("{operation} request failed: {error}")))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|error| surface.error(format!("failed to read {operation} response: {error}")))?;
    if !status.is_success() {
        return Err(surface.error(format!(
            "{operation} rejected: {}",
            parse_api_error(status, &body)
        )));
    }
    Ok(body)
}

async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    surface: Surface,
    operation: &str,
) -> Result<T> {
    let body = send_checked(request, surface, operation).await?;
    serde_json::from_str(&body).map_err(|error| {
        surface.error(format!(
            "unexpected {operation} response ({error}): {}",
            compact_text(&body)
        ))
    })
}

/// `{bucket}/{path}` with every segment percent-encoded.
fn encode_object_path(bucket: &str, path: &str) -> Result<String> {
    let bucket = bucket.trim().trim_matches('/');
    let segments: Vec<_> = path
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    if bucket.is_empty() || segments.is_empty() {
        return Err(Error::Upload(format!(
            "Storage object path is incomplete: '{bucket}/{path}'"
        )));
    }

    let mut encoded = urlencoding::encode(bucket).into_owned();
    for segment in segments {
        encoded.push('/');
        encoded.push_str(&urlencoding::encode(segment));
    }
    Ok(encoded)
}

#[derive(Debug, Deserialize)]
struct SupabaseErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    hint: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<SupabaseErrorResponse>(body) {
        let hint = payload.hint;
        if let Some(message) = payload
            .message
            .or(payload.msg)
            .or(payload.error_description)
            .or(payload.error)
        {
            return match hint.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
                Some(hint) => format!("{} ({}; hint: {hint})", message.trim(), status.as_u16()),
                None => format!("{} ({})", message.trim(), status.as_u16()),
            };
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
