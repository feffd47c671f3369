//! Services built on the OCR engines.
//!
//! - **reader**: turns image files and directories into [`crate::models::Document`]s
//! - **index**: chunks, embeds and retrieves those documents

pub mod index;
pub mod reader;

pub use index::{IndexConfig, IndexedChunk, ScoredChunk, TextChunker, VectorIndex};
pub use reader::{ImageOcrReader, ReaderConfig, ReaderError};
