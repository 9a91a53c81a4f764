//! Configuration file management for ragstore
//!
//! Values live in ~/.ragstore/config.toml. Environment variables take
//! priority over the file; see [`crate::env`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::database::config::{get_config_dir, get_default_db_path};
use crate::embedding::{EmbeddingModel, DEFAULT_HASH_DIMENSIONS};
use crate::env::{embedding as env_embedding, storage as env_storage};
use crate::services::DEFAULT_WORKSPACE_ID;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Every key accepted by [`Config::get`], [`Config::set`] and [`Config::unset`].
pub const CONFIG_KEYS: [&str; 8] = [
    "storage.db_path",
    "storage.workspace_id",
    "vector.enabled",
    "vector.path",
    "embedding.provider",
    "embedding.model",
    "embedding.dimensions",
    "embedding.cache_dir",
];

/// Configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub vector: VectorSection,
    #[serde(default)]
    pub embedding: EmbeddingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VectorSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmbeddingSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<EmbedderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

/// Which embedding provider to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Deterministic feature hashing, no model files
    #[default]
    Hash,
    /// Local ONNX models; needs the `semantic-search` feature
    FastEmbed,
}

impl fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => f.write_str("hash"),
            Self::FastEmbed => f.write_str("fastembed"),
        }
    }
}

impl FromStr for EmbedderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "fastembed" | "fast-embed" => Ok(Self::FastEmbed),
            _ => Err(format!("Unknown embedding provider: {s} (expected hash or fastembed)")),
        }
    }
}

/// Fully resolved settings: defaults, then the file, then the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub workspace_id: String,
    pub vector_enabled: bool,
    /// On-disk vector index directory; the in-memory index is used without one
    pub vector_dir: Option<PathBuf>,
    pub embedder: EmbedderKind,
    pub embedding_model: Option<String>,
    pub embedding_dimensions: Option<usize>,
    pub model_cache_dir: Option<PathBuf>,
}

impl Config {
    /// Get the config file path (~/.ragstore/config.toml)
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path.
    /// Returns default config if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(config_path, permissions).with_context(|| {
                format!(
                    "Failed to set permissions on config file: {}",
                    config_path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Get a config value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "storage.db_path" => self.storage.db_path.as_deref().map(display_path),
            "storage.workspace_id" => self.storage.workspace_id.clone(),
            "vector.enabled" => self.vector.enabled.map(|v| v.to_string()),
            "vector.path" => self.vector.path.as_deref().map(display_path),
            "embedding.provider" => self.embedding.provider.map(|p| p.to_string()),
            "embedding.model" => self.embedding.model.clone(),
            "embedding.dimensions" => self.embedding.dimensions.map(|d| d.to_string()),
            "embedding.cache_dir" => self.embedding.cache_dir.as_deref().map(display_path),
            _ => None,
        }
    }

    /// Set a config value by key, validating it
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match normalize_key(key).as_str() {
            "storage.db_path" => self.storage.db_path = Some(PathBuf::from(value)),
            "storage.workspace_id" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Workspace id must not be empty");
                }
                self.storage.workspace_id = Some(value);
            }
            "vector.enabled" => {
                let enabled = value
                    .trim()
                    .parse::<bool>()
                    .with_context(|| format!("Expected true or false, got: {value}"))?;
                self.vector.enabled = Some(enabled);
            }
            "vector.path" => self.vector.path = Some(PathBuf::from(value)),
            "embedding.provider" => {
                let provider = value.parse::<EmbedderKind>().map_err(anyhow::Error::msg)?;
                self.embedding.provider = Some(provider);
            }
            "embedding.model" => {
                let model = value.parse::<EmbeddingModel>().map_err(anyhow::Error::msg)?;
                self.embedding.model = Some(model.to_string());
            }
            "embedding.dimensions" => {
                let dimensions = value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("Expected a positive integer, got: {value}"))?;
                if dimensions == 0 {
                    anyhow::bail!("Embedding dimensions must be greater than zero");
                }
                self.embedding.dimensions = Some(dimensions);
            }
            "embedding.cache_dir" => self.embedding.cache_dir = Some(PathBuf::from(value)),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Unset (remove) a config value by key
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match normalize_key(key).as_str() {
            "storage.db_path" => self.storage.db_path = None,
            "storage.workspace_id" => self.storage.workspace_id = None,
            "vector.enabled" => self.vector.enabled = None,
            "vector.path" => self.vector.path = None,
            "embedding.provider" => self.embedding.provider = None,
            "embedding.model" => self.embedding.model = None,
            "embedding.dimensions" => self.embedding.dimensions = None,
            "embedding.cache_dir" => self.embedding.cache_dir = None,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get all set config values as key-value pairs
    pub fn list(&self) -> Vec<(String, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    /// Resolve settings against the process environment
    pub fn resolve(&self) -> Result<Settings> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve settings, reading environment variables through `env`
    pub fn resolve_with<F>(&self, env: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let db_path = match lookup(env_storage::DB_PATH) {
            Some(path) => PathBuf::from(path),
            None => match &self.storage.db_path {
                Some(path) => path.clone(),
                None => get_default_db_path()?,
            },
        };

        let workspace_id = lookup(env_storage::WORKSPACE)
            .or_else(|| self.storage.workspace_id.clone())
            .unwrap_or_else(|| DEFAULT_WORKSPACE_ID.to_string());

        let vector_dir = lookup(env_storage::VECTOR_DIR)
            .map(PathBuf::from)
            .or_else(|| self.vector.path.clone());

        let embedding_model = lookup(env_embedding::MODEL).or_else(|| self.embedding.model.clone());

        Ok(Settings {
            db_path,
            workspace_id,
            vector_enabled: self.vector.enabled.unwrap_or(true),
            vector_dir,
            embedder: self.embedding.provider.unwrap_or_default(),
            embedding_model,
            embedding_dimensions: self.embedding.dimensions,
            model_cache_dir: self.embedding.cache_dir.clone(),
        })
    }
}

impl Settings {
    /// Dimensions the hash embedder should produce
    pub fn hash_dimensions(&self) -> usize {
        self.embedding_dimensions.unwrap_or(DEFAULT_HASH_DIMENSIONS)
    }
}

/// Accept `storage.db-path` as well as `storage.db_path`
fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('-', "_")
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
