//! FastEmbed-backed embedding provider.

use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use tracing::info;

use super::config::EmbeddingConfig;
use super::models::{EmbeddingModel, ModelInfo};
use super::{Embedding, EmbeddingProvider};
use crate::error::{RagStoreError, Result};

/// Local ONNX embeddings through FastEmbed-rs.
///
/// Models are downloaded on first use and cached under
/// [`EmbeddingConfig::get_cache_dir`].
pub struct FastEmbedProvider {
    model: TextEmbedding,
    info: ModelInfo,
}

impl FastEmbedProvider {
    /// Create a provider with the given configuration, loading the model.
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let init_options = InitOptions::new(Self::to_fastembed_model(&config.model))
            .with_cache_dir(config.get_cache_dir())
            .with_show_download_progress(config.show_download_progress);

        let model = TextEmbedding::try_new(init_options).map_err(|e| {
            RagStoreError::embedding(format!("Failed to initialize embedding model: {e}"))
        })?;

        let info = ModelInfo::from(config.model);
        info!(model = %info.name, dimensions = info.dimensions, "Embedding model loaded");

        Ok(Self { model, info })
    }

    fn to_fastembed_model(model: &EmbeddingModel) -> FastEmbedModel {
        match model {
            EmbeddingModel::BGESmallENV15 => FastEmbedModel::BGESmallENV15,
            EmbeddingModel::BGESmallENV15Q => FastEmbedModel::BGESmallENV15Q,
            EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
            EmbeddingModel::AllMiniLML6V2Q => FastEmbedModel::AllMiniLML6V2Q,
            EmbeddingModel::BGEBaseENV15 => FastEmbedModel::BGEBaseENV15,
            EmbeddingModel::BGEBaseENV15Q => FastEmbedModel::BGEBaseENV15Q,
        }
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn embed_one(&self, text: &str) -> Result<Embedding> {
        let embeddings = self
            .model
            .embed(vec![text], None)
            .map_err(|e| RagStoreError::embedding(format!("Failed to generate embedding: {e}")))?;

        let vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagStoreError::embedding("No embedding returned"))?;

        Ok(Embedding {
            vector,
            dimension: self.info.dimensions,
        })
    }

    fn dimensions(&self) -> usize {
        self.info.dimensions
    }

    fn model_name(&self) -> String {
        self.info.name.clone()
    }
}
