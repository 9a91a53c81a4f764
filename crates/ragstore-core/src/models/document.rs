use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{decode_vector_with_dimension, encode_vector};
use crate::error::{RagStoreError, Result};

/// Open, string-keyed document metadata over the JSON value union.
pub type Metadata = serde_json::Map<String, Value>;

/// Content type used when the metadata does not carry one.
pub const DEFAULT_CONTENT_TYPE: &str = "text";

/// Metadata key the adapter owns and always overwrites.
pub const WORKSPACE_KEY: &str = "workspace_id";

/// Metadata key carrying the content type of a document.
pub const CONTENT_TYPE_KEY: &str = "content_type";

/// Metadata key `ingest_file` fills with the source path.
pub const PATH_KEY: &str = "path";

/// A row of the `knowledge_embeddings` table.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub id: String,
    pub workspace_id: String,
    pub content_type: String,
    pub text: String,
    /// Codec-encoded embedding.
    pub embedding: Vec<u8>,
    pub embedding_dimension: usize,
    pub metadata: Metadata,
}

impl DocumentRecord {
    /// Build a record, encoding the vector and deriving the content type.
    pub fn new(
        id: impl Into<String>,
        workspace_id: impl Into<String>,
        text: impl Into<String>,
        vector: &[f32],
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            workspace_id: workspace_id.into(),
            content_type: content_type_of(&metadata),
            text: text.into(),
            embedding: encode_vector(vector),
            embedding_dimension: vector.len(),
            metadata,
        }
    }

    /// Decode the stored embedding, checking it against the stored dimension.
    pub fn decode_embedding(&self) -> Result<Vec<f32>> {
        decode_vector_with_dimension(&self.embedding, self.embedding_dimension)
    }

    /// Serialize the metadata for the `content_metadata` column.
    pub fn metadata_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.metadata)?)
    }
}

/// A document as returned by `fetch_by_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub doc_id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Content type from `metadata["content_type"]` when it is a string.
pub fn content_type_of(metadata: &Metadata) -> String {
    metadata
        .get(CONTENT_TYPE_KEY)
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

/// Parse the `content_metadata` column. NULL, empty and JSON `null` map to an
/// empty mapping.
pub fn parse_metadata(raw: Option<&str>) -> Result<Metadata> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Metadata::new()),
        Some(raw) => raw,
    };

    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Metadata::new()),
        other => Err(RagStoreError::validation(
            "content_metadata".to_string(),
            format!("expected a JSON object, found {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_content_type_defaults_to_text() {
        assert_eq!(content_type_of(&Metadata::new()), "text");
        assert_eq!(content_type_of(&meta(json!({"content_type": 3}))), "text");
        assert_eq!(
            content_type_of(&meta(json!({"content_type": "markdown"}))),
            "markdown"
        );
    }

    #[test]
    fn test_record_new_encodes_vector() {
        let record = DocumentRecord::new(
            "doc-1",
            "ws",
            "hello",
            &[0.5, 1.0, -1.0],
            meta(json!({"content_type": "code"})),
        );

        assert_eq!(record.content_type, "code");
        assert_eq!(record.embedding.len(), 12);
        assert_eq!(record.embedding_dimension, 3);
        assert_eq!(record.decode_embedding().unwrap(), vec![0.5, 1.0, -1.0]);
    }

    #[test]
    fn test_parse_metadata_empty_forms() {
        assert!(parse_metadata(None).unwrap().is_empty());
        assert!(parse_metadata(Some("")).unwrap().is_empty());
        assert!(parse_metadata(Some("null")).unwrap().is_empty());
        assert!(parse_metadata(Some("{}")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_metadata_object() {
        let parsed = parse_metadata(Some(r#"{"a": 1, "nested": {"b": [true, null]}}"#)).unwrap();
        assert_eq!(parsed.get("a"), Some(&json!(1)));
        assert_eq!(parsed.get("nested"), Some(&json!({"b": [true, null]})));
    }

    #[test]
    fn test_parse_metadata_rejects_non_objects() {
        assert!(parse_metadata(Some("[1, 2]")).is_err());
        assert!(parse_metadata(Some("not json")).is_err());
    }
}
