//! Deterministic feature-hashing embeddings.

use sha2::{Digest, Sha256};

use super::{Embedding, EmbeddingProvider};
use crate::error::{RagStoreError, Result};

/// Default dimension, matching the small BGE/MiniLM models.
pub const DEFAULT_HASH_DIMENSIONS: usize = 384;

/// Bag-of-words embedding using signed feature hashing.
///
/// Each lowercase alphanumeric token is hashed with SHA-256; the first eight
/// bytes pick a bucket and the ninth byte picks a sign. The result is
/// L2-normalized. Output is stable across platforms and releases, so vectors
/// persisted in the relational store stay comparable. Text without tokens
/// embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagStoreError::validation(
                "dimensions",
                "must be greater than zero",
            ));
        }
        Ok(Self { dimensions })
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);

        let index = (u64::from_le_bytes(head) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_HASH_DIMENSIONS,
        }
    }
}

impl EmbeddingProvider for HashEmbeddingProvider {
    fn embed_one(&self, text: &str) -> Result<Embedding> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in Self::tokens(text) {
            let (index, sign) = self.bucket(&token);
            vector[index] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }

        Ok(Embedding::new(vector))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> String {
        format!("feature-hash-{}", self.dimensions)
    }
}
