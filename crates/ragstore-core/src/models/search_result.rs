use serde::{Deserialize, Serialize};

use super::document::{Metadata, StoredDocument};

/// A vector-search hit joined back to its canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: String,
    /// Similarity score as reported by the vector index.
    pub score: f32,
    /// Raw distance, when the index reports one.
    pub distance: Option<f32>,
    pub text: String,
    pub metadata: Metadata,
}

impl SearchResult {
    pub fn from_document(document: StoredDocument, score: f32, distance: Option<f32>) -> Self {
        Self {
            doc_id: document.doc_id,
            score,
            distance,
            text: document.text,
            metadata: document.metadata,
        }
    }
}
