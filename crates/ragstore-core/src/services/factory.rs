//! Builds a [`RagStorageAdapter`] and its collaborators from [`Settings`].

use std::sync::Arc;

use anyhow::Result;
#[cfg(feature = "semantic-search")]
use anyhow::Context;

use super::rag_storage::RagStorageAdapter;
use crate::config::{EmbedderKind, Settings};
use crate::database::{DatabaseManager, KnowledgeEmbeddingRepository};
use crate::embedding::{EmbeddingProvider, HashEmbeddingProvider};
use crate::vector_index::{InMemoryVectorIndex, VectorIndex};

/// Factory for the storage stack described by [`Settings`]
pub struct StorageFactory;

impl StorageFactory {
    /// Create the embedding provider selected by the settings
    pub fn create_embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
        match settings.embedder {
            EmbedderKind::Hash => {
                let provider = HashEmbeddingProvider::new(settings.hash_dimensions())?;
                Ok(Arc::new(provider))
            }
            EmbedderKind::FastEmbed => Self::create_fastembed(settings),
        }
    }

    #[cfg(feature = "semantic-search")]
    fn create_fastembed(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
        use crate::embedding::{EmbeddingConfig, EmbeddingModel, FastEmbedProvider};

        let model = match &settings.embedding_model {
            Some(name) => name.parse::<EmbeddingModel>().map_err(anyhow::Error::msg)?,
            None => EmbeddingModel::default(),
        };
        if let Some(dimensions) = settings.embedding_dimensions {
            if dimensions != model.dimensions() {
                anyhow::bail!(
                    "Model {model} produces {} dimensions but {dimensions} are configured",
                    model.dimensions()
                );
            }
        }

        let mut config = EmbeddingConfig::new(model);
        if let Some(cache_dir) = &settings.model_cache_dir {
            config = config.with_cache_dir(cache_dir.clone());
        }

        let provider = FastEmbedProvider::new(config).context("Failed to load embedding model")?;
        Ok(Arc::new(provider))
    }

    #[cfg(not(feature = "semantic-search"))]
    fn create_fastembed(_settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
        anyhow::bail!("The fastembed provider requires the semantic-search feature")
    }

    /// Whether the settings select a vector index that outlives the process
    pub fn has_persistent_index(settings: &Settings) -> bool {
        cfg!(feature = "semantic-search")
            && settings.vector_enabled
            && settings.vector_dir.is_some()
    }

    /// Create the vector index selected by the settings, if any
    ///
    /// A configured directory opens a LanceDB index when the
    /// `semantic-search` feature is enabled; otherwise the index lives in
    /// memory for the lifetime of the process.
    pub async fn create_vector_index(
        settings: &Settings,
        dimensions: usize,
    ) -> Result<Option<Arc<dyn VectorIndex>>> {
        if !settings.vector_enabled {
            return Ok(None);
        }

        #[cfg(feature = "semantic-search")]
        if let Some(dir) = &settings.vector_dir {
            let index = crate::vector_index::LanceVectorIndex::open(dir, dimensions)
                .await
                .with_context(|| format!("Failed to open vector index at: {}", dir.display()))?;
            return Ok(Some(Arc::new(index)));
        }

        #[cfg(not(feature = "semantic-search"))]
        if let Some(dir) = &settings.vector_dir {
            tracing::warn!(
                dir = %dir.display(),
                dimensions,
                "On-disk vector index needs the semantic-search feature; using in-memory index"
            );
        }

        Ok(Some(Arc::new(InMemoryVectorIndex::new())))
    }

    /// Open the database and wire the adapter
    pub async fn create_adapter(settings: &Settings) -> Result<RagStorageAdapter> {
        let db = DatabaseManager::new(&settings.db_path).await?;
        let records = Arc::new(KnowledgeEmbeddingRepository::new(&db));

        let embedder = Self::create_embedder(settings)?;
        let vector_index = Self::create_vector_index(settings, embedder.dimensions()).await?;

        tracing::debug!(
            db_path = %settings.db_path.display(),
            workspace_id = %settings.workspace_id,
            embedder = %embedder.model_name(),
            vector_index = vector_index.is_some(),
            "Storage adapter created"
        );

        Ok(RagStorageAdapter::new(records, embedder)
            .with_optional_vector_index(vector_index)
            .with_workspace(settings.workspace_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::PathBuf;

    fn settings() -> Settings {
        let mut config = Config::default();
        config.set("storage.db_path", ":memory:".to_string()).unwrap();
        config.set("embedding.dimensions", "32".to_string()).unwrap();
        config.resolve_with(|_| None).unwrap()
    }

    #[test]
    fn test_create_hash_embedder() {
        let embedder = StorageFactory::create_embedder(&settings()).unwrap();
        assert_eq!(embedder.dimensions(), 32);
        assert_eq!(embedder.model_name(), "feature-hash-32");
    }

    #[cfg(not(feature = "semantic-search"))]
    #[test]
    fn test_fastembed_requires_feature() {
        let settings = Settings {
            embedder: EmbedderKind::FastEmbed,
            ..settings()
        };
        assert!(StorageFactory::create_embedder(&settings).is_err());
    }

    #[tokio::test]
    async fn test_vector_index_disabled() {
        let settings = Settings {
            vector_enabled: false,
            vector_dir: Some(PathBuf::from("/unused")),
            ..settings()
        };
        let index = StorageFactory::create_vector_index(&settings, 32).await.unwrap();
        assert!(index.is_none());
    }

    #[test]
    fn test_memory_index_is_not_persistent() {
        assert!(!StorageFactory::has_persistent_index(&settings()));
        let disabled = Settings {
            vector_enabled: false,
            vector_dir: Some(PathBuf::from("/data/vectors")),
            ..settings()
        };
        assert!(!StorageFactory::has_persistent_index(&disabled));
    }

    #[tokio::test]
    async fn test_vector_index_defaults_to_memory() {
        let index = StorageFactory::create_vector_index(&settings(), 32)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_adapter_in_memory() {
        let settings = Settings {
            workspace_id: "ws1".to_string(),
            ..settings()
        };
        let adapter = StorageFactory::create_adapter(&settings).await.unwrap();

        assert_eq!(adapter.workspace_id(), "ws1");
        assert!(adapter.has_vector_index());

        adapter.ingest_text("a", "hello world", None).await.unwrap();
        let results = adapter.similarity_search("hello", 1).await.unwrap();
        assert_eq!(results[0].doc_id, "a");
    }
}
