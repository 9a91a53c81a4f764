//! Embedding generation boundary.
//!
//! `HashEmbeddingProvider` is always available and needs no model files.
//! `FastEmbedProvider` runs local ONNX models through FastEmbed-rs and requires
//! the `semantic-search` feature.

mod config;
mod hash;
mod models;
#[cfg(feature = "semantic-search")]
mod service;

pub use config::EmbeddingConfig;
pub use hash::{HashEmbeddingProvider, DEFAULT_HASH_DIMENSIONS};
pub use models::{EmbeddingModel, ModelInfo};
#[cfg(feature = "semantic-search")]
pub use service::FastEmbedProvider;

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// One embedded text.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    /// Dimension reported by the provider; must equal `vector.len()`.
    pub dimension: usize,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        let dimension = vector.len();
        Self { vector, dimension }
    }

    /// Check that the reported dimension matches the vector length.
    pub fn is_consistent(&self) -> bool {
        self.dimension == self.vector.len()
    }
}

/// Produces one fixed-dimension vector per input text, synchronously.
#[cfg_attr(test, automock)]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    fn embed_one(&self, text: &str) -> Result<Embedding>;

    /// Number of dimensions of every produced vector
    fn dimensions(&self) -> usize;

    /// Model identifier, for logging
    fn model_name(&self) -> String;
}
