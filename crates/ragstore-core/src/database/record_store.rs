//! Relational record store boundary
//!
//! The relational store is the source of truth for document text and
//! metadata and keeps a codec-encoded copy of every embedding.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::models::{DocumentRecord, StoredDocument};

/// Keyed storage of [`DocumentRecord`]s
///
/// `commit` is always present. Backends that make every write durable before
/// returning keep the default no-op; backends with buffered writes flush
/// there. The adapter calls it after every upsert and delete.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace the record keyed by `record.id`
    async fn upsert(&self, record: &DocumentRecord) -> Result<()>;

    /// Point lookup by id, across all workspaces
    async fn fetch(&self, id: &str) -> Result<Option<StoredDocument>>;

    /// Delete by id; deleting a missing id is not an error
    async fn delete(&self, id: &str) -> Result<()>;

    /// Make preceding writes durable
    async fn commit(&self) -> Result<()> {
        Ok(())
    }

    /// Every record of a workspace, ordered by id
    async fn list_workspace(&self, workspace_id: &str) -> Result<Vec<DocumentRecord>>;

    /// Number of records in a workspace
    async fn count_workspace(&self, workspace_id: &str) -> Result<u64>;
}
