//! In-memory vector index over OCR documents.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::chunker::TextChunker;
use super::config::IndexConfig;
use super::similarity::find_k_most_similar;
use crate::embeddings::EmbeddingService;
use crate::models::{Document, EmbeddingVector, Metadata};

/// One embedded chunk of a document.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub text: String,
    pub chunk_index: usize,
    pub chunk_total: usize,
    /// Copied from the source document.
    pub metadata: Metadata,
    #[serde(skip)]
    pub embedding: EmbeddingVector,
}

impl IndexedChunk {
    /// Source file of the chunk, when the document came from the reader.
    pub fn source(&self) -> Option<&str> {
        self.metadata
            .get("file_name")
            .and_then(serde_json::Value::as_str)
    }
}

/// A query hit.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: IndexedChunk,
    pub score: f32,
}

/// Flat cosine-similarity store; every query scans all chunks.
pub struct VectorIndex {
    embeddings: EmbeddingService,
    chunker: TextChunker,
    config: IndexConfig,
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    pub fn new(embeddings: EmbeddingService, config: IndexConfig) -> Self {
        info!(
            "VectorIndex initialized (chunk_size: {}, overlap: {}, top_k: {}, embeddings: {})",
            config.chunk_size,
            config.chunk_overlap,
            config.top_k,
            embeddings.provider_name()
        );
        Self {
            chunker: TextChunker::from_config(&config),
            embeddings,
            config,
            chunks: Vec::new(),
        }
    }

    /// Builds an index and inserts `documents` into it.
    pub async fn from_documents(
        documents: &[Document],
        embeddings: EmbeddingService,
        config: IndexConfig,
    ) -> Result<Self> {
        let mut index = Self::new(embeddings, config);
        index.insert_documents(documents).await?;
        Ok(index)
    }

    /// Chunks and embeds each document. Returns the number of chunks added.
    ///
    /// Documents with blank text are skipped. On error nothing from the
    /// failing document is stored.
    pub async fn insert_documents(&mut self, documents: &[Document]) -> Result<usize> {
        let mut added = 0;

        for doc in documents {
            if doc.is_empty() {
                debug!("Skipping empty document {}", doc.id);
                continue;
            }

            let pieces = self.chunker.chunk(&doc.text);
            let texts: Vec<String> = pieces.iter().map(|c| c.content.clone()).collect();

            let batch = self
                .embeddings
                .embed_batch(&texts)
                .await
                .with_context(|| format!("Failed to embed chunks of document {}", doc.id))?;

            if batch.embeddings.len() != pieces.len() {
                anyhow::bail!(
                    "Embedding count mismatch for document {}: {} chunks, {} vectors",
                    doc.id,
                    pieces.len(),
                    batch.embeddings.len()
                );
            }

            for (piece, embedding) in pieces.into_iter().zip(batch.embeddings) {
                self.chunks.push(IndexedChunk {
                    id: Uuid::new_v4(),
                    document_id: doc.id,
                    text: piece.content,
                    chunk_index: piece.index,
                    chunk_total: piece.total,
                    metadata: doc.metadata.clone(),
                    embedding,
                });
                added += 1;
            }
        }

        info!("Indexed {} chunks from {} documents", added, documents.len());
        Ok(added)
    }

    /// Returns up to `top_k` chunks by descending cosine similarity.
    pub async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        if self.chunks.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query = self.embeddings.embed(text).await?.embedding;
        let candidates: Vec<&EmbeddingVector> = self.chunks.iter().map(|c| &c.embedding).collect();

        let hits: Vec<ScoredChunk> = find_k_most_similar(&query, &candidates, top_k)
            .into_iter()
            .map(|(idx, score)| ScoredChunk {
                chunk: self.chunks[idx].clone(),
                score,
            })
            .collect();

        debug!("Query returned {} of {} chunks", hits.len(), self.chunks.len());
        Ok(hits)
    }

    /// [`Self::query`] with the configured `top_k`.
    pub async fn query_default(&self, text: &str) -> Result<Vec<ScoredChunk>> {
        self.query(text, self.config.top_k).await
    }

    pub fn chunks(&self) -> &[IndexedChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }
}
