use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use super::filter::MetadataFilter;
use super::types::{VectorEntry, VectorHit};
use super::VectorIndex;
use crate::error::Result;

/// Brute-force cosine index kept in process memory.
///
/// Entries are lost when the index is dropped; `RagStorageAdapter::reindex`
/// rebuilds them from the relational store.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    entries: RwLock<HashMap<String, VectorEntry>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an entry with this id exists.
    pub async fn contains(&self, id: &str) -> bool {
        self.entries.read().await.contains_key(id)
    }

    /// Get a copy of the entry with this id.
    pub async fn get(&self, id: &str) -> Option<VectorEntry> {
        self.entries.read().await.get(id).cloned()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn add(&self, entry: VectorEntry) -> Result<()> {
        self.entries.write().await.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<VectorHit>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let entries = self.entries.read().await;

        let mut hits: Vec<VectorHit> = entries
            .values()
            .filter(|entry| filter.matches(&entry.metadata))
            .filter_map(|entry| {
                let similarity = cosine_similarity(vector, &entry.vector)?;
                Some(VectorHit::new(
                    entry.id.clone(),
                    similarity,
                    Some(1.0 - similarity),
                ))
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(top_k);

        trace!(candidates = entries.len(), hits = hits.len(), "In-memory search");
        Ok(hits)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.entries.write().await.remove(id);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}

/// Cosine similarity, or `None` for mismatched or empty vectors.
///
/// A zero vector has no direction and scores `0.0` against everything, so
/// documents without any tokens still rank instead of disappearing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if !denom.is_finite() {
        return None;
    }
    if denom <= f64::EPSILON {
        return Some(0.0);
    }
    Some((dot / denom) as f32)
}
