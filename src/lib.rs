//! ocrdex: image OCR reader for retrieval pipelines.
//!
//! Images go through an [`ocr::OcrEngine`], the raw output is normalized into
//! scored text blocks, and each image becomes a [`models::Document`] whose
//! metadata records file, engine and confidence statistics. The
//! [`services::index`] module can then chunk, embed and query those documents.

pub mod embeddings;
pub mod models;
pub mod ocr;
pub mod services;

pub use models::{Document, EmbeddingModel, EmbeddingVector, Metadata, TextBlock};

pub use ocr::{MockOcrEngine, OcrEngine, RawOcrOutput, TesseractCliEngine, TextMode};

pub use services::index::{IndexConfig, ScoredChunk, VectorIndex};
pub use services::reader::{ImageOcrReader, ReaderConfig, ReaderError};

pub use embeddings::{EmbeddingConfig, EmbeddingService, MockEmbeddingProvider};
