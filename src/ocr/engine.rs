//! OCR engine trait and the raw output shapes engines produce.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::BoundingBox;

/// A single line as reported by a row-oriented engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    pub bbox: Option<BoundingBox>,
    pub text: String,
    pub confidence: f32,
}

impl RawLine {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox: None,
            text: text.into(),
            confidence,
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

/// Output of an OCR engine before normalization.
///
/// Engines disagree on how they lay out results, so all three layouts are
/// accepted and reconciled by [`crate::ocr::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawOcrOutput {
    /// Parallel arrays. `scores` and `polygons` may be shorter than `texts`.
    Columnar {
        texts: Vec<String>,
        #[serde(default)]
        scores: Vec<f32>,
        #[serde(default)]
        polygons: Vec<BoundingBox>,
    },
    /// One record per detected line.
    Lines(Vec<RawLine>),
    /// Bare text lines, no confidence or geometry.
    Plain(Vec<String>),
}

impl RawOcrOutput {
    /// Output of an engine that found nothing.
    pub fn empty() -> Self {
        RawOcrOutput::Lines(Vec::new())
    }

    /// Number of raw entries, before any filtering.
    pub fn len(&self) -> usize {
        match self {
            RawOcrOutput::Columnar { texts, .. } => texts.len(),
            RawOcrOutput::Lines(lines) => lines.len(),
            RawOcrOutput::Plain(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            RawOcrOutput::Columnar { .. } => "columnar",
            RawOcrOutput::Lines(_) => "lines",
            RawOcrOutput::Plain(_) => "plain",
        }
    }
}

/// Trait for OCR backends.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Runs recognition over one image file.
    async fn recognize(&self, path: &Path) -> Result<RawOcrOutput>;

    /// Engine identifier for logging and metadata.
    fn name(&self) -> &str;

    /// Recognition model label reported in document metadata.
    fn model(&self) -> &str;

    /// Language code the engine was configured with.
    fn language(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_output_len() {
        let columnar = RawOcrOutput::Columnar {
            texts: vec!["a".to_string(), "b".to_string()],
            scores: vec![0.9],
            polygons: vec![],
        };
        assert_eq!(columnar.len(), 2);
        assert_eq!(columnar.shape(), "columnar");

        assert!(RawOcrOutput::empty().is_empty());
        assert_eq!(RawOcrOutput::Plain(vec!["x".to_string()]).len(), 1);
    }

    #[test]
    fn test_raw_output_deserializes_columnar_without_scores() {
        let raw: RawOcrOutput =
            serde_json::from_str(r#"{"columnar": {"texts": ["hello", "world"]}}"#).unwrap();

        match raw {
            RawOcrOutput::Columnar {
                texts,
                scores,
                polygons,
            } => {
                assert_eq!(texts, vec!["hello", "world"]);
                assert!(scores.is_empty());
                assert!(polygons.is_empty());
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }
}
