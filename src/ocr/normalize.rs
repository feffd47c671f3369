//! Reconciles the raw engine layouts into a flat list of text blocks.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::TextBlock;

use super::engine::RawOcrOutput;

/// Confidence assumed when an engine reports none.
pub const DEFAULT_CONFIDENCE: f32 = 1.0;

/// Normalized recognition result for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSummary {
    pub blocks: Vec<TextBlock>,
    pub average_confidence: f32,
    pub min_confidence: f32,
    pub max_confidence: f32,
}

impl OcrSummary {
    /// Builds a summary and its confidence statistics from blocks.
    pub fn from_blocks(blocks: Vec<TextBlock>) -> Self {
        if blocks.is_empty() {
            return Self::default();
        }

        let count = blocks.len() as f32;
        let sum: f32 = blocks.iter().map(|b| b.confidence).sum();
        let min = blocks
            .iter()
            .map(|b| b.confidence)
            .fold(f32::INFINITY, f32::min);
        let max = blocks
            .iter()
            .map(|b| b.confidence)
            .fold(f32::NEG_INFINITY, f32::max);

        Self {
            average_confidence: sum / count,
            min_confidence: min,
            max_confidence: max,
            blocks,
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `(text, confidence)` pairs in block order.
    pub fn text_blocks(&self) -> Vec<(&str, f32)> {
        self.blocks
            .iter()
            .map(|b| (b.text.as_str(), b.confidence))
            .collect()
    }
}

/// Flattens any raw engine output into an [`OcrSummary`].
pub fn normalize(raw: &RawOcrOutput) -> OcrSummary {
    let blocks = match raw {
        RawOcrOutput::Columnar {
            texts,
            scores,
            polygons,
        } => texts
            .iter()
            .enumerate()
            .map(|(idx, text)| {
                let confidence = scores.get(idx).copied().unwrap_or(DEFAULT_CONFIDENCE);
                TextBlock {
                    text: text.clone(),
                    confidence: sanitize_confidence(confidence),
                    bbox: polygons.get(idx).copied(),
                    block_index: idx,
                }
            })
            .collect(),
        RawOcrOutput::Lines(lines) => lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                if line.text.trim().is_empty() {
                    warn!(line = idx, "Skipping OCR line without text");
                    return None;
                }
                Some(TextBlock {
                    text: line.text.clone(),
                    confidence: sanitize_confidence(line.confidence),
                    bbox: line.bbox,
                    block_index: idx,
                })
            })
            .collect(),
        RawOcrOutput::Plain(texts) => texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(idx, text)| TextBlock::new(text.clone(), DEFAULT_CONFIDENCE, idx))
            .collect(),
    };

    OcrSummary::from_blocks(blocks)
}

/// Clamps to `[0, 1]`; NaN and infinities collapse to 0.
fn sanitize_confidence(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;
    use crate::ocr::engine::RawLine;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_average_confidence_of_two_blocks() {
        let raw = RawOcrOutput::Columnar {
            texts: strings(&["a", "b"]),
            scores: vec![0.9, 0.8],
            polygons: vec![],
        };

        let summary = normalize(&raw);

        assert_eq!(summary.block_count(), 2);
        assert_eq!(summary.text_blocks(), vec![("a", 0.9), ("b", 0.8)]);
        assert!((summary.average_confidence - 0.85).abs() < 1e-6);
        assert!((summary.min_confidence - 0.8).abs() < 1e-6);
        assert!((summary.max_confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_columnar_missing_scores_default_to_one() {
        let bbox = BoundingBox::from_rect(0.0, 0.0, 10.0, 10.0);
        let raw = RawOcrOutput::Columnar {
            texts: strings(&["first", "second"]),
            scores: vec![0.5],
            polygons: vec![bbox],
        };

        let summary = normalize(&raw);

        assert_eq!(summary.blocks[0].confidence, 0.5);
        assert_eq!(summary.blocks[0].bbox, Some(bbox));
        assert_eq!(summary.blocks[1].confidence, 1.0);
        assert_eq!(summary.blocks[1].bbox, None);
        assert_eq!(summary.blocks[1].block_index, 1);
    }

    #[test]
    fn test_lines_keep_geometry_and_skip_blank() {
        let bbox = BoundingBox::from_rect(5.0, 5.0, 50.0, 12.0);
        let raw = RawOcrOutput::Lines(vec![
            RawLine::new("Invoice", 0.97).with_bbox(bbox),
            RawLine::new("   ", 0.10),
            RawLine::new("Total: 42", 0.91),
        ]);

        let summary = normalize(&raw);

        assert_eq!(summary.block_count(), 2);
        assert_eq!(summary.blocks[0].bbox, Some(bbox));
        assert_eq!(summary.blocks[1].text, "Total: 42");
        // Original position survives the skipped line
        assert_eq!(summary.blocks[1].block_index, 2);
    }

    #[test]
    fn test_plain_skips_empty_entries() {
        let raw = RawOcrOutput::Plain(strings(&["hello", "", "world"]));

        let summary = normalize(&raw);

        assert_eq!(summary.text_blocks(), vec![("hello", 1.0), ("world", 1.0)]);
        assert_eq!(summary.blocks[1].block_index, 2);
        assert_eq!(summary.average_confidence, 1.0);
    }

    #[test]
    fn test_empty_output() {
        let summary = normalize(&RawOcrOutput::empty());

        assert!(summary.is_empty());
        assert_eq!(summary.average_confidence, 0.0);
        assert_eq!(summary.min_confidence, 0.0);
        assert_eq!(summary.max_confidence, 0.0);
    }

    #[test]
    fn test_out_of_range_confidences_are_clamped() {
        let raw = RawOcrOutput::Columnar {
            texts: strings(&["x", "y", "z"]),
            scores: vec![1.7, -0.2, f32::NAN],
            polygons: vec![],
        };

        let summary = normalize(&raw);

        assert_eq!(summary.blocks[0].confidence, 1.0);
        assert_eq!(summary.blocks[1].confidence, 0.0);
        assert_eq!(summary.blocks[2].confidence, 0.0);
    }
}
