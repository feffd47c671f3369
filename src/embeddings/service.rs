//! High-level embedding service.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::EmbeddingConfig;
use super::mock_provider::MockEmbeddingProvider;
use super::provider::{BatchEmbeddingResult, EmbeddingProvider, EmbeddingResult};
use crate::models::EmbeddingModel;

/// Wraps a provider and guards it against empty input.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: EmbeddingConfig) -> Self {
        info!(
            "EmbeddingService initialized with provider: {}, model: {:?}",
            provider.provider_name(),
            config.model
        );
        Self { provider, config }
    }

    /// Service backed by [`MockEmbeddingProvider`].
    pub fn with_mock(config: EmbeddingConfig) -> Self {
        let provider = MockEmbeddingProvider::new(config.model.clone());
        Self::new(Arc::new(provider), config)
    }

    #[cfg(feature = "embeddings")]
    pub fn with_fastembed(config: EmbeddingConfig) -> Result<Self> {
        use anyhow::Context;

        use super::fastembed_provider::FastEmbedProvider;

        let provider = FastEmbedProvider::new(config.clone())
            .context("Failed to initialize FastEmbed provider")?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// FastEmbed service configured from `EMBEDDING_*` variables.
    #[cfg(feature = "embeddings")]
    pub fn from_env() -> Result<Self> {
        Self::with_fastembed(EmbeddingConfig::from_env())
    }

    /// Without the `embeddings` feature there is no real model to load.
    #[cfg(not(feature = "embeddings"))]
    pub fn from_env() -> Result<Self> {
        warn!("Built without the `embeddings` feature; using mock embeddings");
        Ok(Self::with_mock(EmbeddingConfig::from_env()))
    }

    pub async fn embed(&self, text: &str) -> Result<EmbeddingResult> {
        if text.trim().is_empty() {
            anyhow::bail!("Cannot generate embedding for empty text");
        }

        debug!("Generating embedding for text ({} bytes)", text.len());
        self.provider.embed(text).await
    }

    /// Embeds the non-empty entries of `texts`; empty ones are dropped.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<BatchEmbeddingResult> {
        let non_empty: Vec<String> = texts
            .iter()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect();

        if non_empty.len() != texts.len() {
            warn!(
                "Filtered {} empty texts from batch of {}",
                texts.len() - non_empty.len(),
                texts.len()
            );
        }

        if non_empty.is_empty() {
            return Ok(BatchEmbeddingResult::empty());
        }

        debug!("Generating batch embeddings for {} texts", non_empty.len());
        self.provider.embed_batch(&non_empty).await
    }

    pub fn model(&self) -> &EmbeddingModel {
        self.provider.model()
    }

    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.provider.health_check().await
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> EmbeddingService {
        EmbeddingService::with_mock(EmbeddingConfig::default())
    }

    #[tokio::test]
    async fn test_embed_single_text() {
        let result = service().embed("hello world").await.unwrap();

        assert_eq!(result.embedding.dimension, 384);
        assert!(result.embedding.is_normalized());
    }

    #[tokio::test]
    async fn test_embed_empty_text_fails() {
        let err = service().embed("   ").await.unwrap_err();
        assert!(err.to_string().contains("empty text"));
    }

    #[tokio::test]
    async fn test_embed_batch_filters_empty() {
        let texts = vec![
            "first text".to_string(),
            "".to_string(),
            "third text".to_string(),
        ];

        let result = service().embed_batch(&texts).await.unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.embeddings.len(), 2);
    }

    #[tokio::test]
    async fn test_embed_batch_empty() {
        let result = service().embed_batch(&[]).await.unwrap();
        assert_eq!(result.count, 0);
    }

    #[tokio::test]
    async fn test_service_metadata() {
        let service = EmbeddingService::with_mock(EmbeddingConfig::with_model(
            EmbeddingModel::NomicEmbedTextV15,
        ));

        assert_eq!(*service.model(), EmbeddingModel::NomicEmbedTextV15);
        assert_eq!(service.dimension(), 768);
        assert_eq!(service.provider_name(), "mock");
        assert!(service.health_check().await.unwrap());
    }
}
