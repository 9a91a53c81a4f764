//! Orchestrates writes and reads across the record store, the embedding
//! provider and the optional vector index.
//!
//! The record store is the source of truth. Ingest writes it first and
//! commits, then mirrors the embedding into the vector index. The two writes
//! are not atomic: if the mirror fails the error is returned, a warning names
//! the document, and [`RagStorageAdapter::reindex`] repairs the gap.

use std::path::{Component, Path};
use std::sync::Arc;

use serde_json::Value;

use super::hydration::hydrate_results;
use crate::database::RecordStore;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagStoreError, Result};
use crate::models::{
    DocumentRecord, Metadata, SearchResult, StoredDocument, PATH_KEY, WORKSPACE_KEY,
};
use crate::vector_index::{MetadataFilter, VectorEntry, VectorIndex};

/// Workspace used when none is configured.
pub const DEFAULT_WORKSPACE_ID: &str = "default";

/// Result count for callers that do not pick one.
pub const DEFAULT_TOP_K: usize = 5;

/// Outcome of [`RagStorageAdapter::reindex`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReindexReport {
    /// Records mirrored into the vector index.
    pub reindexed: usize,
    /// Records whose stored embedding could not be decoded.
    pub skipped: usize,
}

/// Storage adapter bound to a single workspace
pub struct RagStorageAdapter {
    records: Arc<dyn RecordStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    workspace_id: String,
}

impl RagStorageAdapter {
    /// Create an adapter without a vector index, in the default workspace.
    pub fn new(records: Arc<dyn RecordStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            records,
            embedder,
            vector_index: None,
            workspace_id: DEFAULT_WORKSPACE_ID.to_string(),
        }
    }

    pub fn with_vector_index(mut self, vector_index: Arc<dyn VectorIndex>) -> Self {
        self.vector_index = Some(vector_index);
        self
    }

    pub fn with_optional_vector_index(
        mut self,
        vector_index: Option<Arc<dyn VectorIndex>>,
    ) -> Self {
        self.vector_index = vector_index;
        self
    }

    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = workspace_id.into();
        self
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn has_vector_index(&self) -> bool {
        self.vector_index.is_some()
    }

    /// Embed and store a document, replacing any document with the same id.
    ///
    /// `metadata["workspace_id"]` is always set to this adapter's workspace.
    pub async fn ingest_text(
        &self,
        doc_id: &str,
        text: &str,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        let vector_index = self.vector_index.as_ref();

        if doc_id.is_empty() {
            return Err(RagStoreError::validation("doc_id", "must not be empty"));
        }

        let mut metadata = metadata.unwrap_or_default();
        metadata.insert(
            WORKSPACE_KEY.to_string(),
            Value::String(self.workspace_id.clone()),
        );

        let vector = self.embed(text)?;

        let record = DocumentRecord::new(doc_id, &self.workspace_id, text, &vector, metadata);
        self.records.upsert(&record).await?;
        self.records.commit().await?;
        tracing::debug!(
            doc_id,
            workspace_id = %self.workspace_id,
            dimensions = vector.len(),
            "Stored document record"
        );

        if let Some(index) = vector_index {
            let entry = VectorEntry::new(doc_id, vector, text, record.metadata);
            if let Err(e) = index.add(entry).await {
                tracing::warn!(
                    doc_id,
                    error = %e,
                    "Document stored without vector mirror; run reindex to repair"
                );
                return Err(e);
            }
        }

        tracing::info!(doc_id, workspace_id = %self.workspace_id, "Ingested document");
        Ok(())
    }

    /// Ingest a file, keyed by its path rendered with forward slashes.
    ///
    /// Invalid UTF-8 is dropped from the content. `metadata["path"]` is set
    /// to the document id. Returns the document id.
    pub async fn ingest_file(
        &self,
        path: impl AsRef<Path>,
        metadata: Option<Metadata>,
    ) -> Result<String> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let text = decode_utf8_dropping_invalid(&bytes);

        let doc_id = path_to_doc_id(path);
        let mut metadata = metadata.unwrap_or_default();
        metadata.insert(PATH_KEY.to_string(), Value::String(doc_id.clone()));

        self.ingest_text(&doc_id, &text, Some(metadata)).await?;
        Ok(doc_id)
    }

    /// Nearest documents to `query` within this workspace, best first.
    ///
    /// Without a vector index this returns an empty list and never embeds.
    pub async fn similarity_search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let Some(index) = self.vector_index.as_ref() else {
            tracing::debug!("No vector index configured; similarity search is empty");
            return Ok(Vec::new());
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embed(query)?;
        let filter = MetadataFilter::workspace(self.workspace_id.as_str());
        let hits = index.search(&vector, top_k, &filter).await?;
        let hit_count = hits.len();

        let results = hydrate_results(self.records.as_ref(), hits).await?;
        tracing::debug!(
            top_k,
            hits = hit_count,
            results = results.len(),
            "Similarity search completed"
        );
        Ok(results)
    }

    /// Point lookup by id. Not restricted to this workspace.
    pub async fn fetch_by_id(&self, doc_id: &str) -> Result<Option<StoredDocument>> {
        self.records.fetch(doc_id).await
    }

    /// Remove a document from the record store and then from the vector index.
    ///
    /// Deleting a missing id is not an error.
    pub async fn delete(&self, doc_id: &str) -> Result<()> {
        let vector_index = self.vector_index.as_ref();

        self.records.delete(doc_id).await?;
        self.records.commit().await?;

        if let Some(index) = vector_index {
            if let Err(e) = index.delete(doc_id).await {
                tracing::warn!(
                    doc_id,
                    error = %e,
                    "Document record deleted but vector mirror remains"
                );
                return Err(e);
            }
        }

        tracing::info!(doc_id, "Deleted document");
        Ok(())
    }

    /// Rebuild the vector mirrors of this workspace from the stored embeddings.
    pub async fn reindex(&self) -> Result<ReindexReport> {
        let Some(index) = self.vector_index.as_ref() else {
            return Ok(ReindexReport::default());
        };

        let records = self.records.list_workspace(&self.workspace_id).await?;
        let mut report = ReindexReport::default();

        for record in records {
            let vector = match record.decode_embedding() {
                Ok(vector) => vector,
                Err(e) => {
                    tracing::warn!(
                        doc_id = %record.id,
                        error = %e,
                        "Skipping undecodable embedding"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            index
                .add(VectorEntry::new(record.id, vector, record.text, record.metadata))
                .await?;
            report.reindexed += 1;
        }

        tracing::info!(
            workspace_id = %self.workspace_id,
            reindexed = report.reindexed,
            skipped = report.skipped,
            "Reindex completed"
        );
        Ok(report)
    }

    /// Number of stored documents in this workspace.
    pub async fn count(&self) -> Result<u64> {
        self.records.count_workspace(&self.workspace_id).await
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.embedder.embed_one(text)?;
        if !embedding.is_consistent() {
            return Err(RagStoreError::validation(
                "embedding".to_string(),
                format!(
                    "provider reported {} dimensions for a vector of length {}",
                    embedding.dimension,
                    embedding.vector.len()
                ),
            ));
        }
        Ok(embedding.vector)
    }
}

/// Render a path with forward slashes, dropping `.` components.
pub fn path_to_doc_id(path: &Path) -> String {
    let mut id = String::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Prefix(prefix) => id.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => id.push('/'),
            Component::ParentDir | Component::Normal(_) => {
                if !id.is_empty() && !id.ends_with('/') {
                    id.push('/');
                }
                id.push_str(&component.as_os_str().to_string_lossy());
            }
        }
    }

    if id.is_empty() {
        id.push('.');
    }
    id
}

/// Decode UTF-8, skipping invalid byte sequences.
fn decode_utf8_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                text.push_str(&String::from_utf8_lossy(valid));
                match e.error_len() {
                    Some(len) => bytes = &rest[len..],
                    None => return text,
                }
            }
        }
    }
}
