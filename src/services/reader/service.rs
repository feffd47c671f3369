//! Image OCR reader.
//!
//! Turns image files into [`Document`]s:
//! 1. Path validation (existence, extension allow-list, size)
//! 2. OCR through the configured engine
//! 3. Normalization of the engine output
//! 4. Text formatting and metadata assembly

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::models::{Document, Metadata};
use crate::ocr::{format_blocks, normalize, OcrEngine, OcrSummary};

use super::config::{ConfigError, ReaderConfig};
use super::error::ReaderError;

pub type ReaderResult<T> = std::result::Result<T, ReaderError>;

/// Reads text out of images and wraps it into documents.
pub struct ImageOcrReader {
    engine: Arc<dyn OcrEngine>,
    config: ReaderConfig,
}

impl ImageOcrReader {
    /// Creates a reader around an existing engine.
    pub fn new(engine: Arc<dyn OcrEngine>, config: ReaderConfig) -> Self {
        info!(
            "ImageOcrReader initialized with engine: {}, language: {}",
            engine.name(),
            engine.language()
        );
        Self { engine, config }
    }

    /// Creates a reader backed by the `tesseract` executable.
    ///
    /// The configuration is validated first.
    pub fn from_config(config: ReaderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = config.build_cli_engine();
        Ok(Self::new(Arc::new(engine), config))
    }

    /// Creates a reader from environment configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(ReaderConfig::from_env())
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn engine(&self) -> &dyn OcrEngine {
        self.engine.as_ref()
    }

    /// Runs OCR on one image and returns the formatted text with its metadata.
    pub async fn extract(&self, path: &Path) -> ReaderResult<(String, Metadata)> {
        self.validate_file(path).await?;

        let start = Instant::now();
        let raw = self
            .engine
            .recognize(path)
            .await
            .map_err(|source| ReaderError::Ocr {
                path: path.to_path_buf(),
                source,
            })?;

        let summary = normalize(&raw);
        debug!(
            path = %path.display(),
            shape = raw.shape(),
            raw_entries = raw.len(),
            blocks = summary.block_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "OCR result normalized"
        );

        if summary.is_empty() {
            warn!(path = %path.display(), "No text detected in image");
        }

        let text = format_blocks(&summary.blocks).render(self.config.text_mode);
        let metadata = self.build_metadata(path, &summary);

        Ok((text, metadata))
    }

    /// Reads one image into a document; `extra_info` is merged into its metadata.
    pub async fn load_file(
        &self,
        path: impl AsRef<Path>,
        extra_info: Option<&Metadata>,
    ) -> ReaderResult<Document> {
        let path = path.as_ref();
        let (text, mut metadata) = self.extract(path).await?;

        if let Some(extra) = extra_info {
            for (key, value) in extra {
                metadata.insert(key.clone(), value.clone());
            }
        }

        Ok(Document::new(text, metadata))
    }

    /// Reads images in order, stopping at the first failure.
    pub async fn load_data<I, P>(
        &self,
        paths: I,
        extra_info: Option<&Metadata>,
    ) -> ReaderResult<Vec<Document>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut documents = Vec::new();

        for path in paths {
            let document = self.load_file(path.as_ref(), extra_info).await?;
            documents.push(document);
        }

        info!("Loaded {} documents", documents.len());
        Ok(documents)
    }

    /// Reads every supported image in a directory.
    ///
    /// Files are processed in path order. A directory without images yields
    /// an empty list.
    pub async fn load_data_from_dir(
        &self,
        dir: impl AsRef<Path>,
        recursive: bool,
        extra_info: Option<&Metadata>,
    ) -> ReaderResult<Vec<Document>> {
        let dir = dir.as_ref();
        let images = self.find_images(dir, recursive).await?;

        if images.is_empty() {
            warn!("No image files found in {}", dir.display());
            return Ok(Vec::new());
        }

        info!(
            "Found {} image files in {}, starting OCR",
            images.len(),
            dir.display()
        );

        self.load_data(&images, extra_info).await
    }

    /// Lists supported images under `dir`, sorted by path.
    pub async fn find_images(&self, dir: &Path, recursive: bool) -> ReaderResult<Vec<PathBuf>> {
        let is_dir = fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(ReaderError::NotADirectory(dir.to_path_buf()));
        }

        let mut images = Vec::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current).await.map_err(|source| ReaderError::Io {
                path: current.clone(),
                source,
            })?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|source| ReaderError::Io {
                    path: current.clone(),
                    source,
                })?
            {
                let path = entry.path();
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        continue;
                    }
                };

                // Symlinked files count as images; symlinked directories are
                // not descended into, so link cycles cannot loop the walk.
                let is_file = if file_type.is_symlink() {
                    match fs::metadata(&path).await {
                        Ok(target) => target.is_file(),
                        Err(e) => {
                            warn!("Skipping dangling link {}: {}", path.display(), e);
                            continue;
                        }
                    }
                } else {
                    file_type.is_file()
                };

                if file_type.is_dir() {
                    if recursive {
                        pending.push(path);
                    }
                } else if is_file && self.config.is_supported(&path) {
                    images.push(path);
                }
            }
        }

        images.sort();
        Ok(images)
    }

    /// Checks existence, type, extension and size of an image path.
    async fn validate_file(&self, path: &Path) -> ReaderResult<()> {
        let meta = match fs::metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReaderError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(ReaderError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if !meta.is_file() {
            return Err(ReaderError::NotAFile(path.to_path_buf()));
        }

        if !self.config.is_supported(path) {
            let extension = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            let supported = self
                .config
                .supported_extensions
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ReaderError::UnsupportedFormat {
                extension,
                supported,
            });
        }

        if meta.len() > self.config.max_file_size {
            return Err(ReaderError::FileTooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                max: self.config.max_file_size,
            });
        }

        Ok(())
    }

    fn build_metadata(&self, path: &Path, summary: &OcrSummary) -> Metadata {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut metadata = Metadata::new();
        metadata.insert(
            "image_path".to_string(),
            Value::String(absolute.to_string_lossy().to_string()),
        );
        metadata.insert("file_name".to_string(), Value::String(file_name));
        metadata.insert("ocr_engine".to_string(), json!(self.engine.name()));
        metadata.insert("ocr_model".to_string(), json!(self.engine.model()));
        metadata.insert("language".to_string(), json!(self.engine.language()));
        metadata.insert("num_text_blocks".to_string(), json!(summary.block_count()));
        metadata.insert(
            "avg_confidence".to_string(),
            json!(round4(summary.average_confidence)),
        );
        metadata.insert(
            "min_confidence".to_string(),
            json!(round4(summary.min_confidence)),
        );
        metadata.insert(
            "max_confidence".to_string(),
            json!(round4(summary.max_confidence)),
        );

        if self.config.include_block_details {
            metadata.insert(
                "text_blocks_detail".to_string(),
                serde_json::to_value(&summary.blocks).unwrap_or(Value::Null),
            );
        }

        metadata
    }
}

/// Rounds to four decimals, the precision kept in metadata.
fn round4(value: f32) -> f64 {
    (f64::from(value) * 10_000.0).round() / 10_000.0
}
