//! Supabase backend setup for the desktop application

use tasklist_core::config::{BackendConfig, ImageUrlPolicy};
use tasklist_core::repository::SupabaseTodoRepository;

const MISSING_CONFIG_MESSAGE: &str =
    "Supabase is not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY (for example in a .env file) and restart.";

/// Build the todo repository from environment configuration.
///
/// Returns a message suitable for display when configuration is missing or
/// invalid; the window shows it in place of the list.
pub fn connect_backend() -> Result<SupabaseTodoRepository, String> {
    repository_from_config(BackendConfig::from_env())
}

fn repository_from_config(
    config: tasklist_core::Result<Option<BackendConfig>>,
) -> Result<SupabaseTodoRepository, String> {
    let config = match config {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::error!("{}", MISSING_CONFIG_MESSAGE);
            return Err(MISSING_CONFIG_MESSAGE.to_string());
        }
        Err(error) => {
            tracing::error!("Invalid backend configuration: {}", error);
            return Err(error.to_string());
        }
    };

    tracing::info!(
        "Using Supabase project {} (table {}, bucket {})",
        config.supabase_url,
        config.table,
        config.image_bucket
    );
    if config.image_url_policy == ImageUrlPolicy::Discard {
        tracing::warn!("Uploaded image URLs will not be saved with new todos");
    }

    SupabaseTodoRepository::new(&config).map_err(|error| {
        tracing::error!("Failed to create Supabase client: {}", error);
        error.to_string()
    })
}
