//! Reader error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning image files into documents.
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Image file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Directory does not exist or is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Unsupported file format: {extension:?}. Supported formats: {supported}")]
    UnsupportedFormat { extension: String, supported: String },

    #[error("File size {size} of {} exceeds maximum {max}", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("OCR failed for {}: {source}", .path.display())]
    Ocr {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReaderError {
    /// Path the error refers to, when there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ReaderError::NotFound(path)
            | ReaderError::NotAFile(path)
            | ReaderError::NotADirectory(path) => Some(path),
            ReaderError::FileTooLarge { path, .. }
            | ReaderError::Ocr { path, .. }
            | ReaderError::Io { path, .. } => Some(path),
            ReaderError::UnsupportedFormat { .. } => None,
        }
    }
}
