//! LanceDB-backed vector index.

use std::path::Path;
use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
    TimestampMicrosecondArray,
};
use arrow_schema::Schema;
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, Table};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::filter::MetadataFilter;
use super::schemas::{embedding_item_field, knowledge_vectors_schema, PROMOTED_COLUMNS};
use super::types::{VectorEntry, VectorHit};
use super::VectorIndex;
use crate::error::{RagStoreError, Result};
use crate::models::{content_type_of, parse_metadata, WORKSPACE_KEY};

const TABLE_NAME: &str = "knowledge_vectors";

/// Initial over-fetch factor when part of the filter has to be applied after
/// search. The limit doubles until enough rows survive or the table runs out.
const POST_FILTER_FACTOR: usize = 4;

/// Vector index stored in a LanceDB directory.
pub struct LanceVectorIndex {
    connection: Connection,
    dimensions: usize,
}

impl LanceVectorIndex {
    /// Open or create a vector index at the given path.
    ///
    /// # Arguments
    /// * `path` - Directory path for the LanceDB database
    /// * `dimensions` - Number of dimensions in embedding vectors (e.g., 384)
    pub async fn open(path: impl AsRef<Path>, dimensions: usize) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        std::fs::create_dir_all(path.as_ref())?;

        let connection = connect(&path_str).execute().await?;

        let index = Self {
            connection,
            dimensions,
        };
        index.ensure_table().await?;

        debug!(path = %path_str, dimensions, "LanceDB vector index opened");
        Ok(index)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn ensure_table(&self) -> Result<()> {
        let tables = self.connection.table_names().execute().await?;
        if tables.iter().any(|name| name == TABLE_NAME) {
            return Ok(());
        }

        let schema = Arc::new(knowledge_vectors_schema(self.dimensions));
        let empty_batch = RecordBatch::new_empty(schema.clone());
        let batches = RecordBatchIterator::new(vec![Ok(empty_batch)], schema);

        self.connection
            .create_table(TABLE_NAME, Box::new(batches))
            .execute()
            .await?;

        Ok(())
    }

    async fn table(&self) -> Result<Table> {
        Ok(self.connection.open_table(TABLE_NAME).execute().await?)
    }

    /// Run one nearest-neighbour query of up to `limit` rows.
    ///
    /// Returns the hits that pass `residual` and the number of rows scanned.
    async fn nearest(
        &self,
        vector: &[f32],
        limit: usize,
        predicate: Option<&str>,
        residual: &MetadataFilter,
    ) -> Result<(Vec<VectorHit>, usize)> {
        let table = self.table().await?;
        let mut query = table.vector_search(vector.to_vec())?.limit(limit);
        if let Some(sql) = predicate {
            query = query.only_if(sql);
        }

        let mut stream = query.execute().await?;

        let mut hits = Vec::new();
        let mut rows = 0;
        while let Some(batch) = stream.try_next().await? {
            rows += batch.num_rows();
            let ids = string_column(&batch, "id")?;
            let metadata = string_column(&batch, "metadata")?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            for i in 0..batch.num_rows() {
                if !residual.is_empty() {
                    let row_metadata = parse_metadata(Some(metadata.value(i)))?;
                    if !residual.matches(&row_metadata) {
                        continue;
                    }
                }

                // Zero vectors come back with a NaN distance and rank last
                let distance = distances
                    .filter(|a| !a.is_null(i))
                    .map(|a| a.value(i))
                    .filter(|d| d.is_finite());
                let score = distance.map(|d| 1.0 - d).unwrap_or(0.0);
                hits.push(VectorHit::new(ids.value(i), score, distance));
            }
        }

        Ok((hits, rows))
    }

    fn entry_to_batch(&self, entry: &VectorEntry, schema: &Arc<Schema>) -> Result<RecordBatch> {
        let workspace_id = entry
            .metadata
            .get(WORKSPACE_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let metadata = serde_json::to_string(&entry.metadata)?;
        let text_hash = hex::encode(Sha256::digest(entry.text.as_bytes()));

        let embedding = FixedSizeListArray::new(
            embedding_item_field(),
            self.dimensions as i32,
            Arc::new(Float32Array::from(entry.vector.clone())),
            None,
        );
        let embedded_at = TimestampMicrosecondArray::from(vec![Utc::now().timestamp_micros()])
            .with_timezone("UTC".to_string());

        Ok(RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![entry.id.as_str()])),
                Arc::new(StringArray::from(vec![workspace_id])),
                Arc::new(StringArray::from(vec![content_type_of(&entry.metadata)])),
                Arc::new(StringArray::from(vec![entry.text.as_str()])),
                Arc::new(StringArray::from(vec![metadata])),
                Arc::new(embedding),
                Arc::new(StringArray::from(vec![text_hash])),
                Arc::new(embedded_at),
            ],
        )?)
    }
}

/// Quote a string literal for a LanceDB SQL predicate.
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Split a filter into a SQL predicate over promoted columns and the
/// conditions that must be checked against the metadata JSON.
fn split_filter(filter: &MetadataFilter) -> (Option<String>, MetadataFilter) {
    let mut conditions = Vec::new();
    let mut pushed = Vec::new();

    for column in PROMOTED_COLUMNS {
        if let Some(Value::String(value)) = filter.get(column) {
            conditions.push(format!("{column} = {}", sql_literal(value)));
            pushed.push(column);
        }
    }

    let residual = filter.without(&pushed);
    if conditions.is_empty() {
        (None, residual)
    } else {
        (Some(conditions.join(" AND ")), residual)
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| RagStoreError::vector_index(format!("missing column {name}")))
}

#[async_trait]
impl VectorIndex for LanceVectorIndex {
    async fn add(&self, entry: VectorEntry) -> Result<()> {
        if entry.vector.len() != self.dimensions {
            return Err(RagStoreError::vector_index(format!(
                "vector for {} has {} dimensions, index expects {}",
                entry.id,
                entry.vector.len(),
                self.dimensions
            )));
        }

        // Delete existing if present
        self.delete(&entry.id).await?;

        let table = self.table().await?;
        let schema = Arc::new(knowledge_vectors_schema(self.dimensions));
        let batch = self.entry_to_batch(&entry, &schema)?;
        let batches = RecordBatchIterator::new(vec![Ok(batch)], schema);

        table.add(Box::new(batches)).execute().await?;
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

        let (predicate, residual) = split_filter(filter);
        if residual.is_empty() {
            let (hits, _) = self
                .nearest(vector, top_k, predicate.as_deref(), &residual)
                .await?;
            return Ok(hits);
        }

        let mut limit = top_k.saturating_mul(POST_FILTER_FACTOR);
        loop {
            let (mut hits, rows) = self
                .nearest(vector, limit, predicate.as_deref(), &residual)
                .await?;
            if hits.len() >= top_k || rows < limit || limit == usize::MAX {
                hits.truncate(top_k);
                return Ok(hits);
            }
            debug!(
                limit,
                matched = hits.len(),
                "Post-filter left too few hits, widening search"
            );
            limit = limit.saturating_mul(2);
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let table = self.table().await?;
        table.delete(&format!("id = {}", sql_literal(id))).await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let table = self.table().await?;
        Ok(table.count_rows(None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metadata;
    use serde_json::json;
    use tempfile::TempDir;

    async fn create_test_index() -> (LanceVectorIndex, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let index = LanceVectorIndex::open(temp_dir.path(), 4).await.unwrap();
        (index, temp_dir)
    }

    fn entry(id: &str, vector: Vec<f32>, metadata: Value) -> VectorEntry {
        let metadata: Metadata = metadata.as_object().cloned().unwrap();
        VectorEntry::new(id, vector, format!("text of {id}"), metadata)
    }

    #[test]
    fn test_sql_literal_escapes_quotes() {
        assert_eq!(sql_literal("plain"), "'plain'");
        assert_eq!(sql_literal("it's"), "'it''s'");
    }

    #[test]
    fn test_split_filter() {
        let filter = MetadataFilter::workspace("ws").with_eq("lang", "rust");
        let (sql, residual) = split_filter(&filter);
        assert_eq!(sql.unwrap(), "workspace_id = 'ws'");
        assert_eq!(residual.get("lang"), Some(&json!("rust")));
        assert!(residual.get("workspace_id").is_none());

        let (sql, residual) = split_filter(&MetadataFilter::new());
        assert!(sql.is_none());
        assert!(residual.is_empty());
    }

    #[tokio::test]
    async fn test_open_empty_index() {
        let (index, _temp_dir) = create_test_index().await;
        assert_eq!(index.count().await.unwrap(), 0);
        assert_eq!(index.dimensions(), 4);
    }

    #[tokio::test]
    async fn test_add_search_delete() {
        let (index, _temp_dir) = create_test_index().await;

        index
            .add(entry("a", vec![1.0, 0.0, 0.0, 0.0], json!({"workspace_id": "ws1"})))
            .await
            .unwrap();
        index
            .add(entry("b", vec![0.0, 1.0, 0.0, 0.0], json!({"workspace_id": "ws2"})))
            .await
            .unwrap();
        // Re-adding replaces rather than duplicates
        index
            .add(entry("a", vec![1.0, 0.0, 0.0, 0.0], json!({"workspace_id": "ws1"})))
            .await
            .unwrap();
        assert_eq!(index.count().await.unwrap(), 2);

        let hits = index
            .search(&[1.0, 0.0, 0.0, 0.0], 5, &MetadataFilter::workspace("ws1"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
        assert!(hits[0].distance.is_some());

        index.delete("a").await.unwrap();
        assert_eq!(index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_post_filter_widens_until_top_k_found() {
        let (index, _temp_dir) = create_test_index().await;

        // Twenty near neighbours without the tag crowd out the tagged entries
        for i in 0..20 {
            let vector = vec![1.0, 0.01 * i as f32, 0.0, 0.0];
            index
                .add(entry(&format!("near-{i:02}"), vector, json!({"workspace_id": "ws"})))
                .await
                .unwrap();
        }
        for id in ["tagged-a", "tagged-b"] {
            index
                .add(entry(
                    id,
                    vec![0.0, 0.0, 1.0, 0.0],
                    json!({"workspace_id": "ws", "lang": "rust"}),
                ))
                .await
                .unwrap();
        }

        let filter = MetadataFilter::workspace("ws").with_eq("lang", "rust");
        let hits = index.search(&[1.0, 0.0, 0.0, 0.0], 2, &filter).await.unwrap();

        let mut ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["tagged-a", "tagged-b"]);
    }

    #[tokio::test]
    async fn test_add_rejects_wrong_dimension() {
        let (index, _temp_dir) = create_test_index().await;
        let err = index
            .add(entry("a", vec![1.0, 0.0], json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "vector_index");
    }
}
