//! Image reader configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ocr::{TesseractCliEngine, TextMode};

/// Image extensions accepted by default.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

/// Page segmentation mode with orientation and script detection.
pub const PSM_AUTO_OSD: u8 = 1;

/// Configuration for [`super::ImageOcrReader`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// OCR language (e.g., "eng", "chi_sim", "fra").
    pub language: String,

    /// Tesseract page segmentation mode.
    pub page_seg_mode: u8,

    /// Detect page orientation before recognition (forces PSM 1).
    pub detect_orientation: bool,

    /// Tesseract executable.
    pub tesseract_bin: String,

    /// Extra arguments passed through to the engine.
    pub extra_args: Vec<String>,

    /// Accepted file extensions (lowercase, without dot).
    pub supported_extensions: Vec<String>,

    /// Maximum image size in bytes (default: 50MB).
    pub max_file_size: u64,

    /// How recognized blocks become document text.
    pub text_mode: TextMode,

    /// Attach every block (text, confidence, bbox) to the metadata.
    pub include_block_details: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            page_seg_mode: 3,
            detect_orientation: false,
            tesseract_bin: "tesseract".to_string(),
            extra_args: Vec::new(),
            supported_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_file_size: 50 * 1024 * 1024, // 50MB
            text_mode: TextMode::Combined,
            include_block_details: false,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set OCR language.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.language = lang.to_string();
        self
    }

    /// Builder: set page segmentation mode.
    pub fn with_page_seg_mode(mut self, mode: u8) -> Self {
        self.page_seg_mode = mode;
        self
    }

    /// Builder: enable/disable orientation detection.
    pub fn with_orientation_detection(mut self, enabled: bool) -> Self {
        self.detect_orientation = enabled;
        self
    }

    /// Builder: set the tesseract executable.
    pub fn with_tesseract_bin(mut self, bin: &str) -> Self {
        self.tesseract_bin = bin.to_string();
        self
    }

    /// Builder: set extra engine arguments.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Builder: set accepted extensions.
    pub fn with_supported_extensions(mut self, extensions: Vec<String>) -> Self {
        self.supported_extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Builder: set maximum file size.
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Builder: set text mode.
    pub fn with_text_mode(mut self, mode: TextMode) -> Self {
        self.text_mode = mode;
        self
    }

    /// Builder: attach per-block details to metadata.
    pub fn with_block_details(mut self, enabled: bool) -> Self {
        self.include_block_details = enabled;
        self
    }

    /// Creates configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("OCR_LANGUAGE") {
            config.language = val;
        }

        if let Ok(val) = std::env::var("OCR_PAGE_SEG_MODE") {
            if let Ok(mode) = val.parse::<u8>() {
                config.page_seg_mode = mode;
            }
        }

        if let Ok(val) = std::env::var("OCR_DETECT_ORIENTATION") {
            config.detect_orientation = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("OCR_TESSERACT_BIN") {
            config.tesseract_bin = val;
        }

        if let Ok(val) = std::env::var("OCR_MAX_FILE_SIZE") {
            if let Ok(size) = val.parse::<u64>() {
                config.max_file_size = size;
            }
        }

        if let Ok(val) = std::env::var("OCR_INCLUDE_BLOCK_DETAILS") {
            config.include_block_details = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("OCR_TEXT_MODE") {
            if let Some(mode) = TextMode::from_name(&val) {
                config.text_mode = mode;
            }
        }

        config
    }

    /// Page segmentation mode handed to the engine.
    pub fn effective_page_seg_mode(&self) -> u8 {
        if self.detect_orientation {
            PSM_AUTO_OSD
        } else {
            self.page_seg_mode
        }
    }

    /// Checks a path's extension against the allow-list (case-insensitive).
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                self.supported_extensions
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }

    /// Builds the command-line Tesseract engine described by this config.
    pub fn build_cli_engine(&self) -> TesseractCliEngine {
        TesseractCliEngine::new()
            .with_binary(&self.tesseract_bin)
            .with_language(&self.language)
            .with_page_seg_mode(self.effective_page_seg_mode())
            .with_extra_args(self.extra_args.clone())
    }

    /// Validates configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.trim().is_empty() {
            return Err(ConfigError::EmptyLanguage);
        }
        if self.page_seg_mode > 13 {
            return Err(ConfigError::InvalidPageSegMode(self.page_seg_mode));
        }
        if self.supported_extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::ZeroMaxFileSize);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyLanguage,
    InvalidPageSegMode(u8),
    NoExtensions,
    ZeroMaxFileSize,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLanguage => write!(f, "OCR language must not be empty"),
            Self::InvalidPageSegMode(mode) => {
                write!(f, "Page segmentation mode {} is out of range (0-13)", mode)
            }
            Self::NoExtensions => write!(f, "At least one image extension must be supported"),
            Self::ZeroMaxFileSize => write!(f, "Maximum file size must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ReaderConfig::default();
        assert_eq!(config.language, "eng");
        assert_eq!(config.page_seg_mode, 3);
        assert_eq!(config.text_mode, TextMode::Combined);
        assert!(!config.include_block_details);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ReaderConfig::new()
            .with_language("chi_sim")
            .with_page_seg_mode(6)
            .with_text_mode(TextMode::Plain)
            .with_block_details(true)
            .with_max_file_size(1024);

        assert_eq!(config.language, "chi_sim");
        assert_eq!(config.page_seg_mode, 6);
        assert_eq!(config.text_mode, TextMode::Plain);
        assert!(config.include_block_details);
        assert_eq!(config.max_file_size, 1024);
    }

    #[test]
    fn test_orientation_forces_osd_mode() {
        let config = ReaderConfig::new().with_page_seg_mode(6);
        assert_eq!(config.effective_page_seg_mode(), 6);

        let config = config.with_orientation_detection(true);
        assert_eq!(config.effective_page_seg_mode(), PSM_AUTO_OSD);
    }

    #[test]
    fn test_is_supported() {
        let config = ReaderConfig::default();
        assert!(config.is_supported(Path::new("scan.png")));
        assert!(config.is_supported(Path::new("photo.JPG")));
        assert!(config.is_supported(Path::new("/a/b/page.tif")));
        assert!(!config.is_supported(Path::new("notes.txt")));
        assert!(!config.is_supported(Path::new("no_extension")));
    }

    #[test]
    fn test_custom_extensions_are_normalized() {
        let config =
            ReaderConfig::new().with_supported_extensions(vec![".PNG".to_string(), "gif".to_string()]);
        assert_eq!(config.supported_extensions, vec!["png", "gif"]);
        assert!(config.is_supported(Path::new("anim.gif")));
        assert!(!config.is_supported(Path::new("scan.jpg")));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ReaderConfig::new();
        config.language = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyLanguage));

        let config = ReaderConfig::new().with_page_seg_mode(14);
        assert_eq!(config.validate(), Err(ConfigError::InvalidPageSegMode(14)));

        let config = ReaderConfig::new().with_supported_extensions(vec![]);
        assert_eq!(config.validate(), Err(ConfigError::NoExtensions));

        let config = ReaderConfig::new().with_max_file_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxFileSize));
    }
}
