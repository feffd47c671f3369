//! Tesseract engine driven through its command line.
//!
//! Runs `tesseract <image> stdout -l <lang> --psm <mode> tsv` and groups the
//! word rows of the TSV table into lines, so every line carries a confidence
//! and a bounding box.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::models::BoundingBox;

use super::engine::{OcrEngine, RawLine, RawOcrOutput};

/// TSV level of word rows.
const WORD_LEVEL: u32 = 5;

/// Expected number of TSV columns.
const TSV_COLUMNS: usize = 12;

/// OCR through the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractCliEngine {
    binary: PathBuf,
    language: String,
    page_seg_mode: u8,
    extra_args: Vec<String>,
    model: String,
}

impl TesseractCliEngine {
    /// Creates an engine for the English model with automatic page segmentation.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_seg_mode: 3,
            extra_args: Vec::new(),
            model: "tesseract-lstm".to_string(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Sets the binary to invoke (name on `PATH` or absolute path).
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Sets the page segmentation mode.
    ///
    /// Common modes:
    /// - 1: Automatic page segmentation with orientation detection
    /// - 3: Fully automatic page segmentation (default)
    /// - 6: Assume a single uniform block of text
    /// - 7: Treat the image as a single text line
    pub fn with_page_seg_mode(mut self, mode: u8) -> Self {
        self.page_seg_mode = mode;
        self
    }

    /// Extra arguments placed before the `tsv` config name, e.g. `--oem 1`.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// The image path is passed through untouched, so non-UTF-8 names work.
    fn build_args(&self, path: &Path) -> Vec<OsString> {
        let mut args = vec![
            path.as_os_str().to_os_string(),
            OsString::from("stdout"),
            OsString::from("-l"),
            OsString::from(&self.language),
            OsString::from("--psm"),
            OsString::from(self.page_seg_mode.to_string()),
        ];
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(OsString::from("tsv"));
        args
    }
}

impl Default for TesseractCliEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractCliEngine {
    async fn recognize(&self, path: &Path) -> Result<RawOcrOutput> {
        let args = self.build_args(path);
        debug!(binary = %self.binary.display(), ?args, "Running tesseract");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "Tesseract failed on {} ({}): {}",
                path.display(),
                output.status,
                stderr.trim()
            ));
        }

        let tsv = String::from_utf8(output.stdout).context("Tesseract produced invalid UTF-8")?;
        let lines = parse_tsv(&tsv)?;

        debug!(path = %path.display(), lines = lines.len(), "Tesseract finished");
        Ok(RawOcrOutput::Lines(lines))
    }

    fn name(&self) -> &str {
        "tesseract-cli"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn language(&self) -> &str {
        &self.language
    }
}

/// Accumulates the words of one line.
#[derive(Default)]
struct LineAccumulator {
    words: Vec<String>,
    confidence_sum: f32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl LineAccumulator {
    fn push(&mut self, word: &str, confidence: f32, rect: (f32, f32, f32, f32)) {
        let (left, top, width, height) = rect;
        if self.words.is_empty() {
            self.left = left;
            self.top = top;
            self.right = left + width;
            self.bottom = top + height;
        } else {
            self.left = self.left.min(left);
            self.top = self.top.min(top);
            self.right = self.right.max(left + width);
            self.bottom = self.bottom.max(top + height);
        }
        self.words.push(word.to_string());
        self.confidence_sum += confidence;
    }

    fn finish(self) -> RawLine {
        let confidence = self.confidence_sum / self.words.len() as f32 / 100.0;
        let bbox = BoundingBox::from_rect(
            self.left,
            self.top,
            self.right - self.left,
            self.bottom - self.top,
        );
        RawLine::new(self.words.join(" "), confidence).with_bbox(bbox)
    }
}

/// Parses Tesseract TSV output into lines.
///
/// Only word rows with text and a non-negative confidence contribute; rows are
/// grouped by `(page, block, paragraph, line)` in reading order.
pub fn parse_tsv(tsv: &str) -> Result<Vec<RawLine>> {
    let mut groups: BTreeMap<(u32, u32, u32, u32), LineAccumulator> = BTreeMap::new();

    for (row, line) in tsv.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with("level") {
            continue;
        }

        let fields: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if fields.len() < TSV_COLUMNS - 1 {
            return Err(anyhow!(
                "Malformed TSV row {}: expected {} columns, got {}",
                row + 1,
                TSV_COLUMNS,
                fields.len()
            ));
        }

        let number = |idx: usize| -> Result<u32> {
            fields[idx]
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid integer in TSV row {} column {}", row + 1, idx + 1))
        };

        if number(0)? != WORD_LEVEL {
            continue;
        }

        let text = fields.get(11).map(|t| t.trim()).unwrap_or("");
        let confidence: f32 = fields[10]
            .trim()
            .parse()
            .with_context(|| format!("Invalid confidence in TSV row {}", row + 1))?;

        if text.is_empty() || confidence < 0.0 {
            continue;
        }

        let key = (number(1)?, number(2)?, number(3)?, number(4)?);
        let rect = (
            number(6)? as f32,
            number(7)? as f32,
            number(8)? as f32,
            number(9)? as f32,
        );

        groups.entry(key).or_default().push(text, confidence, rect);
    }

    Ok(groups.into_values().map(LineAccumulator::finish).collect())
}
