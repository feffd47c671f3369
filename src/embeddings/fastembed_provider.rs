//! Local embeddings through fastembed (ONNX runtime).

#![cfg(feature = "embeddings")]

use anyhow::{Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::config::EmbeddingConfig;
use super::provider::{BatchEmbeddingResult, EmbeddingProvider, EmbeddingResult};
use crate::models::{EmbeddingModel, EmbeddingVector};

pub struct FastEmbedProvider {
    model: Arc<TextEmbedding>,
    config: EmbeddingConfig,
    dimension: usize,
}

impl FastEmbedProvider {
    /// Loads the model, downloading it into the cache dir on first use.
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        info!("Initializing FastEmbed provider with model: {:?}", config.model);

        let mut options = InitOptions::new(map_model(&config.model)?);
        if let Some(ref cache_dir) = config.cache_dir {
            options = options.with_cache_dir(PathBuf::from(cache_dir));
        }

        let model = TextEmbedding::try_new(options).context("Failed to initialize FastEmbed model")?;
        let dimension = config.model.dimension();

        info!("FastEmbed provider ready (dimension: {})", dimension);

        Ok(Self {
            model: Arc::new(model),
            config,
            dimension,
        })
    }

    /// Runs the blocking ONNX call off the async executor.
    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let batch_size = self.config.batch_size;
        let vectors = tokio::task::spawn_blocking(move || model.embed(texts, Some(batch_size)))
            .await
            .context("Embedding task panicked")?
            .context("Failed to generate embeddings")?;

        if self.config.normalize {
            Ok(vectors.into_iter().map(unit_length).collect())
        } else {
            Ok(vectors)
        }
    }
}

fn map_model(model: &EmbeddingModel) -> Result<FastEmbedModel> {
    match model {
        EmbeddingModel::NomicEmbedTextV15 => Ok(FastEmbedModel::NomicEmbedTextV15),
        EmbeddingModel::BaaiBgeSmall => Ok(FastEmbedModel::BGESmallENV15),
        EmbeddingModel::AllMiniLmL6V2 => Ok(FastEmbedModel::AllMiniLML6V2),
        EmbeddingModel::Custom(name) => {
            anyhow::bail!("Custom model '{}' not supported by FastEmbed", name)
        }
    }
}

fn unit_length(mut vector: Vec<f32>) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingResult> {
        let start = Instant::now();
        let vector = self
            .run(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .context("No embedding returned")?;

        Ok(EmbeddingResult {
            embedding: EmbeddingVector::new(vector, self.config.model.clone()),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<BatchEmbeddingResult> {
        if texts.is_empty() {
            return Ok(BatchEmbeddingResult::empty());
        }

        let start = Instant::now();
        let embeddings: Vec<EmbeddingVector> = self
            .run(texts.to_vec())
            .await?
            .into_iter()
            .map(|v| EmbeddingVector::new(v, self.config.model.clone()))
            .collect();
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!("Embedded {} texts in {}ms", embeddings.len(), latency_ms);

        Ok(BatchEmbeddingResult {
            count: embeddings.len(),
            embeddings,
            latency_ms,
        })
    }

    fn model(&self) -> &EmbeddingModel {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.embed("health check").await.is_ok())
    }

    fn provider_name(&self) -> &str {
        "fastembed"
    }
}
