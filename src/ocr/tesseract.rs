//! In-process Tesseract engine.
//!
//! This module requires the `ocr` feature to be enabled.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tesseract::Tesseract;

use super::engine::{OcrEngine, RawOcrOutput};

/// OCR through libtesseract.
///
/// The binding only exposes the recognized text, so results come back as
/// [`RawOcrOutput::Plain`] without confidences.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    /// OCR language code (e.g., "eng", "spa", "chi_sim").
    language: String,
    /// Directory holding `.traineddata` files; `None` uses the system default.
    datapath: Option<String>,
    /// PSM (Page Segmentation Mode) for Tesseract.
    page_seg_mode: u8,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            language: "eng".to_string(),
            datapath: None,
            page_seg_mode: 3,
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_datapath(mut self, datapath: &str) -> Self {
        self.datapath = Some(datapath.to_string());
        self
    }

    pub fn with_page_seg_mode(mut self, mode: u8) -> Self {
        self.page_seg_mode = mode;
        self
    }

    fn run(
        language: &str,
        datapath: Option<&str>,
        page_seg_mode: u8,
        path: &str,
    ) -> Result<Vec<String>> {
        let tess = Tesseract::new(datapath, Some(language))
            .map_err(|e| anyhow!("Failed to initialize Tesseract: {}", e))?;

        let tess = tess
            .set_variable("tessedit_pageseg_mode", &page_seg_mode.to_string())
            .map_err(|e| anyhow!("Failed to set PSM: {}", e))?;

        let mut tess = tess
            .set_image(path)
            .map_err(|e| anyhow!("Failed to load image {}: {}", path, e))?;

        let text = tess.get_text().map_err(|e| anyhow!("OCR failed: {}", e))?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, path: &Path) -> Result<RawOcrOutput> {
        let language = self.language.clone();
        let datapath = self.datapath.clone();
        let page_seg_mode = self.page_seg_mode;
        let path = path.to_string_lossy().to_string();

        // libtesseract blocks for the whole recognition pass
        let lines = tokio::task::spawn_blocking(move || {
            Self::run(&language, datapath.as_deref(), page_seg_mode, &path)
        })
        .await
        .context("Tesseract worker panicked")??;

        Ok(RawOcrOutput::Plain(lines))
    }

    fn name(&self) -> &str {
        "tesseract"
    }

    fn model(&self) -> &str {
        "tesseract-lstm"
    }

    fn language(&self) -> &str {
        &self.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_builder() {
        let engine = TesseractEngine::new()
            .with_language("spa")
            .with_datapath("/usr/share/tessdata")
            .with_page_seg_mode(6);

        assert_eq!(engine.language(), "spa");
        assert_eq!(engine.datapath.as_deref(), Some("/usr/share/tessdata"));
        assert_eq!(engine.page_seg_mode, 6);
        assert_eq!(engine.name(), "tesseract");
    }

    #[tokio::test]
    async fn test_recognize_missing_file_fails() {
        let engine = TesseractEngine::new();
        let result = engine.recognize(Path::new("/nonexistent/image.png")).await;
        assert!(result.is_err());
    }
}
