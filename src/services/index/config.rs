//! Index configuration.

use serde::{Deserialize, Serialize};

/// Configuration for chunking and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Chunk size in bytes. OCR documents carry a detailed block listing,
    /// so the default is larger than for prose.
    pub chunk_size: usize,

    /// Overlap between consecutive chunks.
    pub chunk_overlap: usize,

    /// Minimum chunk size (smaller pieces are dropped unless last).
    pub min_chunk_size: usize,

    /// Number of chunks returned by a query.
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2048,
            chunk_overlap: 200,
            min_chunk_size: 100,
            top_k: 3,
        }
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(100);
        self
    }

    /// Builder: set chunk overlap.
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap.min(self.chunk_size / 2);
        self
    }

    /// Builder: set minimum chunk size.
    pub fn with_min_chunk_size(mut self, size: usize) -> Self {
        self.min_chunk_size = size;
        self
    }

    /// Builder: set top-k.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Creates configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("INDEX_CHUNK_SIZE") {
            if let Ok(size) = val.parse::<usize>() {
                config.chunk_size = size;
            }
        }

        if let Ok(val) = std::env::var("INDEX_CHUNK_OVERLAP") {
            if let Ok(overlap) = val.parse::<usize>() {
                config.chunk_overlap = overlap;
            }
        }

        if let Ok(val) = std::env::var("INDEX_TOP_K") {
            if let Ok(k) = val.parse::<usize>() {
                config.top_k = k;
            }
        }

        config
    }

    /// Validates configuration.
    pub fn validate(&self) -> Result<(), IndexConfigError> {
        if self.chunk_size < 50 {
            return Err(IndexConfigError::ChunkSizeTooSmall);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(IndexConfigError::OverlapTooLarge);
        }
        if self.min_chunk_size > self.chunk_size {
            return Err(IndexConfigError::MinChunkTooLarge);
        }
        if self.top_k == 0 {
            return Err(IndexConfigError::ZeroTopK);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexConfigError {
    ChunkSizeTooSmall,
    OverlapTooLarge,
    MinChunkTooLarge,
    ZeroTopK,
}

impl std::fmt::Display for IndexConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChunkSizeTooSmall => write!(f, "Chunk size must be at least 50 characters"),
            Self::OverlapTooLarge => write!(f, "Chunk overlap must be less than chunk size"),
            Self::MinChunkTooLarge => write!(f, "Minimum chunk size must be less than chunk size"),
            Self::ZeroTopK => write!(f, "top_k must be at least 1"),
        }
    }
}

impl std::error::Error for IndexConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = IndexConfig::default();
        assert_eq!(config.chunk_size, 2048);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.top_k, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder_clamps() {
        let config = IndexConfig::new().with_chunk_size(10).with_chunk_overlap(80);
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.chunk_overlap, 50);
    }

    #[test]
    fn test_config_validation() {
        let mut config = IndexConfig::new();
        config.chunk_size = 30;
        assert_eq!(config.validate(), Err(IndexConfigError::ChunkSizeTooSmall));

        let mut config = IndexConfig::new();
        config.chunk_overlap = config.chunk_size;
        assert_eq!(config.validate(), Err(IndexConfigError::OverlapTooLarge));

        let mut config = IndexConfig::new();
        config.min_chunk_size = config.chunk_size + 1;
        assert_eq!(config.validate(), Err(IndexConfigError::MinChunkTooLarge));

        let config = IndexConfig::new().with_top_k(0);
        assert_eq!(config.validate(), Err(IndexConfigError::ZeroTopK));
    }
}
