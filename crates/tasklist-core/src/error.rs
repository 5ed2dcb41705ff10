//! Error types for tasklist-core

use thiserror::Error;

/// Result type alias using tasklist-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tasklist-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database request failed or was rejected by the store
    #[error("Remote error: {0}")]
    Remote(String),

    /// Image upload or public URL resolution failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or malformed backend configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
