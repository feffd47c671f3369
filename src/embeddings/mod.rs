//! Text embeddings for indexing OCR output.
//!
//! Providers:
//! - FastEmbed (local ONNX models, requires the `embeddings` feature)
//! - Mock provider (deterministic, used in tests and feature-less builds)

pub mod config;
pub mod mock_provider;
pub mod provider;
pub mod service;

#[cfg(feature = "embeddings")]
pub mod fastembed_provider;

pub use config::EmbeddingConfig;
pub use mock_provider::MockEmbeddingProvider;
pub use provider::{BatchEmbeddingResult, EmbeddingProvider, EmbeddingResult};
pub use service::EmbeddingService;

#[cfg(feature = "embeddings")]
pub use fastembed_provider::FastEmbedProvider;
