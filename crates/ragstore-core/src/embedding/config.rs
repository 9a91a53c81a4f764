//! Configuration for local model embeddings.

use std::path::PathBuf;

use super::models::EmbeddingModel;
use crate::database::config::APP_DIR_NAME;

/// Configuration for the FastEmbed provider.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// The embedding model to use.
    pub model: EmbeddingModel,

    /// Directory to cache downloaded models.
    /// Defaults to `~/.ragstore/models/` if not specified.
    pub cache_dir: Option<PathBuf>,

    /// Whether to show download progress when fetching models.
    pub show_download_progress: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModel::default(),
            cache_dir: None,
            show_download_progress: false,
        }
    }
}

impl EmbeddingConfig {
    /// Create a new configuration with the specified model.
    pub fn new(model: EmbeddingModel) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    /// Set the cache directory for downloaded models.
    pub fn with_cache_dir(mut self, path: PathBuf) -> Self {
        self.cache_dir = Some(path);
        self
    }

    /// Set whether to show download progress.
    pub fn with_show_download_progress(mut self, show: bool) -> Self {
        self.show_download_progress = show;
        self
    }

    /// Get the cache directory, using default if not specified.
    pub fn get_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
                .join("models")
        })
    }
}
