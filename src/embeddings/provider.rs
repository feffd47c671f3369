//! Embedding provider seam.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{EmbeddingModel, EmbeddingVector};

/// A single embedding and how long it took.
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    pub embedding: EmbeddingVector,
    pub latency_ms: u64,
}

/// Embeddings for a batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchEmbeddingResult {
    pub embeddings: Vec<EmbeddingVector>,
    pub latency_ms: u64,
    pub count: usize,
}

impl BatchEmbeddingResult {
    pub fn empty() -> Self {
        Self {
            embeddings: Vec::new(),
            latency_ms: 0,
            count: 0,
        }
    }
}

/// Backend that turns text into vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingResult>;

    /// Embeds every text; the result has one vector per input, in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<BatchEmbeddingResult>;

    fn model(&self) -> &EmbeddingModel;

    fn dimension(&self) -> usize;

    async fn health_check(&self) -> Result<bool>;

    /// Short name used in logs.
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_result() {
        let result = BatchEmbeddingResult::empty();
        assert_eq!(result.count, 0);
        assert!(result.embeddings.is_empty());
    }
}
