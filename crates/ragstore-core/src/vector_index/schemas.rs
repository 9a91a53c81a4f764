//! Arrow schema of the LanceDB vector table.

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema, TimeUnit};

/// Metadata keys stored as their own columns so they can be filtered in SQL.
pub const PROMOTED_COLUMNS: [&str; 2] = ["workspace_id", "content_type"];

/// Field describing one element of the embedding list.
pub fn embedding_item_field() -> Arc<Field> {
    Arc::new(Field::new("item", DataType::Float32, false))
}

/// Get the Arrow schema for the knowledge vectors table.
///
/// # Arguments
/// * `dimensions` - Number of dimensions in the embedding vector (e.g., 384)
pub fn knowledge_vectors_schema(dimensions: usize) -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("workspace_id", DataType::Utf8, false),
        Field::new("content_type", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new(
            "embedding",
            DataType::FixedSizeList(embedding_item_field(), dimensions as i32),
            false,
        ),
        Field::new("text_hash", DataType::Utf8, false),
        Field::new(
            "embedded_at",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
    ])
}
