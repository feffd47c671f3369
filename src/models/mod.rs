pub mod document;
pub mod embedding;
pub mod ocr;

pub use document::{Document, Metadata};
pub use embedding::{EmbeddingModel, EmbeddingVector};
pub use ocr::{BoundingBox, TextBlock};
