use thiserror::Error;

/// Error type shared by the storage boundaries and the adapter
#[derive(Error, Debug)]
pub enum RagStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "semantic-search")]
    #[error("LanceDB error: {0}")]
    Lance(#[from] lancedb::Error),

    #[cfg(feature = "semantic-search")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("Vector codec error: {message}")]
    Codec { message: String },

    #[error("Embedding error: {message}")]
    Embedding { message: String },

    #[error("Vector index error: {message}")]
    VectorIndex { message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl RagStoreError {
    /// Create a vector codec error
    pub fn codec<S: Into<String>>(message: S) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Create an embedding provider error
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a vector index error
    pub fn vector_index<S: Into<String>>(message: S) -> Self {
        Self::VectorIndex {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown error
    pub fn unknown<S: Into<String>>(message: S) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            RagStoreError::Database(_) => "database",
            RagStoreError::Io(_) => "io",
            RagStoreError::Json(_) => "json",
            #[cfg(feature = "semantic-search")]
            RagStoreError::Lance(_) => "vector_index",
            #[cfg(feature = "semantic-search")]
            RagStoreError::Arrow(_) => "vector_index",
            RagStoreError::Codec { .. } => "codec",
            RagStoreError::Embedding { .. } => "embedding",
            RagStoreError::VectorIndex { .. } => "vector_index",
            RagStoreError::Validation { .. } => "validation",
            RagStoreError::Unknown { .. } => "unknown",
        }
    }
}

/// Convert anyhow::Error to RagStoreError
impl From<anyhow::Error> for RagStoreError {
    fn from(err: anyhow::Error) -> Self {
        // Keep the full context chain in the message
        RagStoreError::Unknown {
            message: format!("{err:#}"),
        }
    }
}

/// Result type alias for ragstore
pub type Result<T> = std::result::Result<T, RagStoreError>;
