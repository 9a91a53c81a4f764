//! Vector index boundary and its implementations.
//!
//! The index is a derived, search-optimized projection of the relational
//! records. `InMemoryVectorIndex` is always available; the LanceDB-backed
//! index requires the `semantic-search` feature.

mod filter;
mod memory;
mod types;

#[cfg(feature = "semantic-search")]
mod lance;
#[cfg(feature = "semantic-search")]
mod schemas;

pub use filter::MetadataFilter;
pub use memory::{cosine_similarity, InMemoryVectorIndex};
pub use types::{VectorEntry, VectorHit};

#[cfg(feature = "semantic-search")]
pub use lance::LanceVectorIndex;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// Similarity search over embeddings keyed by document id
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add an entry, replacing any existing entry with the same id
    async fn add(&self, entry: VectorEntry) -> Result<()>;

    /// Up to `top_k` entries nearest to `vector` that match `filter`, best first
    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<VectorHit>>;

    /// Remove an entry; removing a missing id is not an error
    async fn delete(&self, id: &str) -> Result<()>;

    /// Number of entries in the index
    async fn count(&self) -> Result<usize>;
}
