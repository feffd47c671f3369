//! Embedding configuration.

use serde::{Deserialize, Serialize};

use crate::models::EmbeddingModel;

/// Configuration for the embedding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model: EmbeddingModel,

    /// Texts per provider call.
    pub batch_size: usize,

    /// Scale vectors to unit length after generation.
    pub normalize: bool,

    /// Where downloaded model files are kept.
    pub cache_dir: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModel::BaaiBgeSmall,
            batch_size: 32,
            normalize: true,
            cache_dir: None,
        }
    }
}

impl EmbeddingConfig {
    pub fn with_model(model: EmbeddingModel) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<String>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Loads configuration from `EMBEDDING_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = std::env::var("EMBEDDING_MODEL")
            .map(|m| EmbeddingModel::from_name(&m))
            .unwrap_or(defaults.model);

        let batch_size = std::env::var("EMBEDDING_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.batch_size);

        let normalize = std::env::var("EMBEDDING_NORMALIZE")
            .map(|s| s == "true" || s == "1")
            .unwrap_or(defaults.normalize);

        let cache_dir = std::env::var("EMBEDDING_CACHE_DIR").ok();

        Self {
            model,
            batch_size,
            normalize,
            cache_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.model, EmbeddingModel::BaaiBgeSmall);
        assert_eq!(config.batch_size, 32);
        assert!(config.normalize);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = EmbeddingConfig::with_model(EmbeddingModel::AllMiniLmL6V2)
            .batch_size(0)
            .normalize(false)
            .cache_dir("/tmp/models");

        assert_eq!(config.model, EmbeddingModel::AllMiniLmL6V2);
        assert_eq!(config.batch_size, 1);
        assert!(!config.normalize);
        assert_eq!(config.cache_dir.as_deref(), Some("/tmp/models"));
    }
}
