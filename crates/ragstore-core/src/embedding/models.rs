//! Supported local embedding models.

use std::fmt;

/// Supported embedding models.
///
/// Quantized variants (Q suffix) are smaller and faster at slightly lower
/// quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbeddingModel {
    /// BGE Small English v1.5, 384 dimensions.
    #[default]
    BGESmallENV15,
    /// BGE Small English v1.5 (quantized), 384 dimensions.
    BGESmallENV15Q,
    /// All MiniLM L6 v2, 384 dimensions.
    AllMiniLML6V2,
    /// All MiniLM L6 v2 (quantized), 384 dimensions.
    AllMiniLML6V2Q,
    /// BGE Base English v1.5, 768 dimensions.
    BGEBaseENV15,
    /// BGE Base English v1.5 (quantized), 768 dimensions.
    BGEBaseENV15Q,
}

impl EmbeddingModel {
    /// Get the number of dimensions for this model's embeddings.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::BGESmallENV15 | Self::BGESmallENV15Q => 384,
            Self::AllMiniLML6V2 | Self::AllMiniLML6V2Q => 384,
            Self::BGEBaseENV15 | Self::BGEBaseENV15Q => 768,
        }
    }

    /// Check if this is a quantized model variant.
    pub fn is_quantized(&self) -> bool {
        matches!(
            self,
            Self::BGESmallENV15Q | Self::AllMiniLML6V2Q | Self::BGEBaseENV15Q
        )
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BGESmallENV15 => "bge-small-en-v1.5",
            Self::BGESmallENV15Q => "bge-small-en-v1.5-q",
            Self::AllMiniLML6V2 => "all-minilm-l6-v2",
            Self::AllMiniLML6V2Q => "all-minilm-l6-v2-q",
            Self::BGEBaseENV15 => "bge-base-en-v1.5",
            Self::BGEBaseENV15Q => "bge-base-en-v1.5-q",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for EmbeddingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bgesmallenv15" | "bge-small-en-v1.5" => Ok(Self::BGESmallENV15),
            "bgesmallenv15q" | "bge-small-en-v1.5-q" => Ok(Self::BGESmallENV15Q),
            "allminilml6v2" | "all-minilm-l6-v2" => Ok(Self::AllMiniLML6V2),
            "allminilml6v2q" | "all-minilm-l6-v2-q" => Ok(Self::AllMiniLML6V2Q),
            "bgebaseenv15" | "bge-base-en-v1.5" => Ok(Self::BGEBaseENV15),
            "bgebaseenv15q" | "bge-base-en-v1.5-q" => Ok(Self::BGEBaseENV15Q),
            _ => Err(format!("Unknown embedding model: {s}")),
        }
    }
}

/// Information about the loaded embedding model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub model: EmbeddingModel,
    pub name: String,
    pub dimensions: usize,
    pub quantized: bool,
}

impl From<EmbeddingModel> for ModelInfo {
    fn from(model: EmbeddingModel) -> Self {
        Self {
            name: model.to_string(),
            dimensions: model.dimensions(),
            quantized: model.is_quantized(),
            model,
        }
    }
}
