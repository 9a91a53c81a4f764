use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

use super::connection::DatabaseManager;
use super::record_store::RecordStore;
use crate::error::{RagStoreError, Result};
use crate::models::{parse_metadata, DocumentRecord, StoredDocument};

/// SQLite-backed [`RecordStore`] over the `knowledge_embeddings` table.
///
/// Each statement runs in SQLite's autocommit mode, so writes are durable when
/// the call returns and `commit` keeps the trait's no-op default.
pub struct KnowledgeEmbeddingRepository {
    pool: Pool<Sqlite>,
}

impl KnowledgeEmbeddingRepository {
    pub fn new(db: &DatabaseManager) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    fn row_to_document(&self, id: &str, row: &SqliteRow) -> Result<StoredDocument> {
        let text: String = row.try_get("content_text")?;
        let metadata: Option<String> = row.try_get("content_metadata")?;

        Ok(StoredDocument {
            doc_id: id.to_string(),
            text,
            metadata: parse_metadata(metadata.as_deref())?,
        })
    }

    fn row_to_record(&self, row: &SqliteRow) -> Result<DocumentRecord> {
        let id: String = row.try_get("embedding_id")?;
        let workspace_id: String = row.try_get("workspace_id")?;
        let content_type: String = row.try_get("content_type")?;
        let text: String = row.try_get("content_text")?;
        let embedding: Vec<u8> = row.try_get("embedding_vector")?;
        let dimensions: i64 = row.try_get("embedding_dimensions")?;
        let metadata: Option<String> = row.try_get("content_metadata")?;

        let embedding_dimension = usize::try_from(dimensions).map_err(|_| {
            RagStoreError::validation(
                "embedding_dimensions".to_string(),
                format!("negative dimension {dimensions} for record {id}"),
            )
        })?;

        Ok(DocumentRecord {
            metadata: parse_metadata(metadata.as_deref())?,
            id,
            workspace_id,
            content_type,
            text,
            embedding,
            embedding_dimension,
        })
    }
}

#[async_trait]
impl RecordStore for KnowledgeEmbeddingRepository {
    async fn upsert(&self, record: &DocumentRecord) -> Result<()> {
        let metadata = record.metadata_json()?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO knowledge_embeddings (
                embedding_id, workspace_id, content_type, content_text,
                embedding_vector, embedding_dimensions, content_metadata
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.workspace_id)
        .bind(&record.content_type)
        .bind(&record.text)
        .bind(&record.embedding)
        .bind(record.embedding_dimension as i64)
        .bind(metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Option<StoredDocument>> {
        let row = sqlx::query(
            r#"
            SELECT content_text, content_metadata
            FROM knowledge_embeddings WHERE embedding_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_document(id, &row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM knowledge_embeddings WHERE embedding_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_workspace(&self, workspace_id: &str) -> Result<Vec<DocumentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT embedding_id, workspace_id, content_type, content_text,
                   embedding_vector, embedding_dimensions, content_metadata
            FROM knowledge_embeddings WHERE workspace_id = ?
            ORDER BY embedding_id
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_record(row)).collect()
    }

    async fn count_workspace(&self, workspace_id: &str) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_embeddings WHERE workspace_id = ?")
                .bind(workspace_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }
}
