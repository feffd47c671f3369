//! OCR engines and result handling.
//!
//! - [`OcrEngine`]: async trait every backend implements
//! - [`TesseractCliEngine`]: drives the `tesseract` executable (TSV output)
//! - `TesseractEngine`: libtesseract binding (requires `ocr` feature)
//! - [`normalize`]: reconciles the raw output layouts into text blocks
//! - [`format_blocks`]: detailed and plain renderings of the blocks
//!
//! # Example
//!
//! ```ignore
//! use ocrdex::ocr::{format_blocks, normalize, OcrEngine, TesseractCliEngine, TextMode};
//!
//! let engine = TesseractCliEngine::new().with_language("eng");
//! let raw = engine.recognize(Path::new("scan.png")).await?;
//! let summary = normalize(&raw);
//! println!("{}", format_blocks(&summary.blocks).render(TextMode::Plain));
//! ```

pub mod engine;
pub mod format;
pub mod mock;
pub mod normalize;
pub mod tesseract_cli;

#[cfg(feature = "ocr")]
pub mod tesseract;

pub use engine::{OcrEngine, RawLine, RawOcrOutput};
pub use format::{format_blocks, FormattedText, TextMode, PLAIN_TEXT_HEADING};
pub use mock::MockOcrEngine;
pub use normalize::{normalize, OcrSummary, DEFAULT_CONFIDENCE};
pub use tesseract_cli::{parse_tsv, TesseractCliEngine};

#[cfg(feature = "ocr")]
pub use self::tesseract::TesseractEngine;
