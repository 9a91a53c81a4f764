//! Storage orchestration for a retrieval-augmented knowledge store.
//!
//! Documents are embedded, persisted in a relational store (the source of
//! truth) and optionally mirrored into a vector index. Similarity search
//! results coming back from the index are hydrated from the relational copy.

pub mod codec;
pub mod config;
pub mod database;
pub mod embedding;
pub mod env;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod vector_index;

// Re-exports for convenience
pub use database::{DatabaseManager, KnowledgeEmbeddingRepository, RecordStore};
pub use embedding::{
    Embedding, EmbeddingConfig, EmbeddingModel, EmbeddingProvider, HashEmbeddingProvider,
};
pub use error::{RagStoreError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use models::{DocumentRecord, Metadata, SearchResult, StoredDocument};
pub use services::{RagStorageAdapter, ReindexReport, DEFAULT_TOP_K, DEFAULT_WORKSPACE_ID};
pub use vector_index::{InMemoryVectorIndex, MetadataFilter, VectorEntry, VectorHit, VectorIndex};

#[cfg(feature = "semantic-search")]
pub use embedding::FastEmbedProvider;
#[cfg(feature = "semantic-search")]
pub use vector_index::LanceVectorIndex;
