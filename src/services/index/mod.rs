//! Glue that backs the `query` subcommand: chunk reader documents, embed
//! them through an [`crate::embeddings::EmbeddingService`] and rank by cosine.
//!
//! This is a linear scan over an in-memory list, not a vector store. Real
//! pipelines hand the reader's documents to their own RAG framework.

pub mod chunker;
pub mod config;
pub mod service;
pub mod similarity;

pub use chunker::{TextChunk, TextChunker};
pub use config::{IndexConfig, IndexConfigError};
pub use service::{IndexedChunk, ScoredChunk, VectorIndex};
pub use similarity::find_k_most_similar;
