pub mod config;
pub mod documents;
pub mod search;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use ragstore_core::config::{Config, EmbedderKind, Settings};
use ragstore_core::services::DEFAULT_TOP_K;
use ragstore_core::Metadata;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options that override config.toml and environment variables
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Workspace every command is scoped to
    #[arg(long, global = true)]
    pub workspace: Option<String>,

    /// SQLite database path (":memory:" for a throwaway database)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory of the on-disk vector index
    #[arg(long, global = true, conflicts_with = "no_vector")]
    pub vector_dir: Option<PathBuf>,

    /// Run without a vector index; search returns nothing
    #[arg(long, global = true)]
    pub no_vector: bool,

    /// Embedding provider: hash or fastembed
    #[arg(long, global = true)]
    pub embedder: Option<EmbedderKind>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Apply command-line overrides on top of resolved settings
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(workspace) = &self.workspace {
            settings.workspace_id = workspace.clone();
        }
        if let Some(db) = &self.db {
            settings.db_path = db.clone();
        }
        if let Some(dir) = &self.vector_dir {
            settings.vector_enabled = true;
            settings.vector_dir = Some(dir.clone());
        }
        if self.no_vector {
            settings.vector_enabled = false;
        }
        if let Some(embedder) = self.embedder {
            settings.embedder = embedder;
        }
        settings
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest files, keyed by their path
    ///
    /// Examples:
    ///   ragstore ingest README.md docs/guide.md
    ///   ragstore ingest notes.txt --meta source=notes --meta priority=2
    Ingest {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Extra metadata as key=value; values are parsed as JSON when possible
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },

    /// Ingest a text under an explicit id
    IngestText {
        /// Document id
        id: String,
        /// Document text
        text: String,

        /// Extra metadata as key=value; values are parsed as JSON when possible
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },

    /// Find documents similar to a query
    Search {
        /// Search query
        query: String,
        /// Maximum number of results
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a stored document
    Get {
        /// Document id
        id: String,
    },

    /// Delete a document
    Delete {
        /// Document id
        id: String,
    },

    /// Rebuild the vector index from the stored embeddings
    Reindex,

    /// Count documents in the workspace
    Count,

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key to get
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set
        value: String,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key to remove
        key: String,
    },
    /// List all configuration values
    List,
}

/// Route and execute CLI commands
pub async fn run_command(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Commands::Config { command } => {
            return self::config::handle_config_command(command).await;
        }
        command => command,
    };

    let settings = cli.global.apply(Config::load()?.resolve()?);
    run_with_settings(command, &settings).await
}

/// Execute a document command against explicit settings
pub async fn run_with_settings(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Ingest { files, meta } => {
            self::documents::handle_ingest(settings, files, parse_meta(&meta)?).await
        }
        Commands::IngestText { id, text, meta } => {
            self::documents::handle_ingest_text(settings, id, text, parse_meta(&meta)?).await
        }
        Commands::Search { query, top_k, json } => {
            self::search::handle_search(settings, query, top_k, json).await
        }
        Commands::Get { id } => self::documents::handle_get(settings, id).await,
        Commands::Delete { id } => self::documents::handle_delete(settings, id).await,
        Commands::Reindex => self::search::handle_reindex(settings).await,
        Commands::Count => self::documents::handle_count(settings).await,
        Commands::Config { .. } => anyhow::bail!("Config commands do not use storage settings"),
    }
}

/// Parse repeated `key=value` options into metadata
///
/// Values that parse as JSON keep their type; anything else is a string.
pub fn parse_meta(entries: &[String]) -> Result<Option<Metadata>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let mut metadata = Metadata::new();
    for entry in entries {
        let (key, raw) = entry
            .split_once('=')
            .with_context(|| format!("Expected key=value, got: {entry}"))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Metadata key must not be empty: {entry}");
        }

        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        metadata.insert(key.to_string(), value);
    }

    Ok(Some(metadata))
}
