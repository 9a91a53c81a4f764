use serde::{Deserialize, Serialize};

use crate::models::Metadata;

/// An embedding mirrored into the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub vector: Vec<f32>,
    /// Denormalized copy of the document text.
    pub text: String,
    /// Denormalized copy of the document metadata, used for filtering.
    pub metadata: Metadata,
}

impl VectorEntry {
    pub fn new(
        id: impl Into<String>,
        vector: Vec<f32>,
        text: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            vector,
            text: text.into(),
            metadata,
        }
    }
}

/// A raw search hit, before hydration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: String,
    /// Similarity, higher is better.
    pub score: f32,
    pub distance: Option<f32>,
}

impl VectorHit {
    pub fn new(id: impl Into<String>, score: f32, distance: Option<f32>) -> Self {
        Self {
            id: id.into(),
            score,
            distance,
        }
    }
}
