//! Environment variable constants used throughout the crate
//!
//! All environment variable names live here so the CLI, the config loader and
//! the logging setup agree on them.

/// Logging configuration
pub mod logging {
    /// Log level configuration (e.g., "debug", "info", "warn", "error")
    pub const LOG_LEVEL: &str = "RAGSTORE_LOG_LEVEL";

    /// Log file path for file-based logging
    pub const LOG_FILE: &str = "RAGSTORE_LOG_FILE";

    /// Set to "json" for structured log lines
    pub const LOG_FORMAT: &str = "RAGSTORE_LOG_FORMAT";

    /// Disable colored output (follows the NO_COLOR standard)
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Storage configuration overrides
pub mod storage {
    /// Path of the SQLite database holding document records
    pub const DB_PATH: &str = "RAGSTORE_DB_PATH";

    /// Workspace every adapter operation is scoped to
    pub const WORKSPACE: &str = "RAGSTORE_WORKSPACE";

    /// Directory of the on-disk vector index
    pub const VECTOR_DIR: &str = "RAGSTORE_VECTOR_DIR";
}

/// Embedding configuration overrides
pub mod embedding {
    /// Embedding model name (e.g. "bge-small-en-v1.5")
    pub const MODEL: &str = "RAGSTORE_EMBEDDING_MODEL";
}
