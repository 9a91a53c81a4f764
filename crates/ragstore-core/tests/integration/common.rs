use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ragstore_core::{
    DatabaseManager, HashEmbeddingProvider, InMemoryVectorIndex, KnowledgeEmbeddingRepository,
    MetadataFilter, Metadata, RagStorageAdapter, RagStoreError, Result, VectorEntry, VectorHit,
    VectorIndex,
};
use serde_json::Value;

pub const DIMENSIONS: usize = 64;

/// Shared backends for one test
pub struct Stores {
    pub records: Arc<KnowledgeEmbeddingRepository>,
    pub index: Arc<FlakyVectorIndex>,
    pub embedder: Arc<HashEmbeddingProvider>,
}

impl Stores {
    pub async fn new() -> Self {
        let db = DatabaseManager::open_in_memory().await.unwrap();
        Self {
            records: Arc::new(KnowledgeEmbeddingRepository::new(&db)),
            index: Arc::new(FlakyVectorIndex::default()),
            embedder: Arc::new(HashEmbeddingProvider::new(DIMENSIONS).unwrap()),
        }
    }

    pub fn adapter(&self, workspace_id: &str) -> RagStorageAdapter {
        RagStorageAdapter::new(self.records.clone(), self.embedder.clone())
            .with_vector_index(self.index.clone())
            .with_workspace(workspace_id)
    }

    pub fn adapter_without_index(&self) -> RagStorageAdapter {
        RagStorageAdapter::new(self.records.clone(), self.embedder.clone())
    }
}

pub fn meta(value: Value) -> Metadata {
    value.as_object().cloned().unwrap()
}

/// In-memory index that can be told to fail writes.
#[derive(Default)]
pub struct FlakyVectorIndex {
    pub inner: InMemoryVectorIndex,
    fail_writes: AtomicBool,
}

impl FlakyVectorIndex {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RagStoreError::vector_index("index unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for FlakyVectorIndex {
    async fn add(&self, entry: VectorEntry) -> Result<()> {
        self.check()?;
        self.inner.add(entry).await
    }

    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<VectorHit>> {
        self.inner.search(vector, top_k, filter).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.check()?;
        self.inner.delete(id).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}
