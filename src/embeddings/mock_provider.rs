//! Deterministic embedding provider for tests and offline runs.

use anyhow::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};

use super::provider::{BatchEmbeddingResult, EmbeddingProvider, EmbeddingResult};
use crate::models::{EmbeddingModel, EmbeddingVector};

/// Hashes each lowercase word into a bucket, so texts sharing words score
/// higher than unrelated ones. Vectors are unit length.
pub struct MockEmbeddingProvider {
    model: EmbeddingModel,
    dimension: usize,
    latency_ms: u64,
    should_fail: bool,
}

impl MockEmbeddingProvider {
    pub fn new(model: EmbeddingModel) -> Self {
        let dimension = match model.dimension() {
            0 => 384,
            d => d,
        };
        Self {
            model,
            dimension,
            latency_ms: 0,
            should_fail: false,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension.max(1);
        self
    }

    /// Simulated latency per call.
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn should_fail(mut self, fail: bool) -> Self {
        self.should_fail = fail;
        self
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        let mut tokens = 0;
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = (djb2(&word.to_lowercase()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
            tokens += 1;
        }

        if tokens == 0 {
            let bucket = (djb2(text) % self.dimension as u64) as usize;
            vector[bucket] = 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        for value in &mut vector {
            *value /= norm;
        }
        vector
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;
        }
    }
}

fn djb2(text: &str) -> u64 {
    text.bytes()
        .fold(5381u64, |hash, byte| hash.wrapping_mul(33).wrapping_add(byte as u64))
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingResult> {
        if self.should_fail {
            anyhow::bail!("Mock embedding provider configured to fail");
        }

        let start = Instant::now();
        self.simulate_latency().await;

        Ok(EmbeddingResult {
            embedding: EmbeddingVector::new(self.generate(text), self.model.clone()),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<BatchEmbeddingResult> {
        if self.should_fail {
            anyhow::bail!("Mock embedding provider configured to fail");
        }

        let start = Instant::now();
        self.simulate_latency().await;

        let embeddings: Vec<EmbeddingVector> = texts
            .iter()
            .map(|text| EmbeddingVector::new(self.generate(text), self.model.clone()))
            .collect();

        Ok(BatchEmbeddingResult {
            count: embeddings.len(),
            embeddings,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn model(&self) -> &EmbeddingModel {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.should_fail)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
