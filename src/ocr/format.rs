//! Text rendering for recognized blocks.

use serde::{Deserialize, Serialize};

use crate::models::TextBlock;

/// Heading that separates the detailed listing from the plain text.
pub const PLAIN_TEXT_HEADING: &str = "=== Plain Text ===";

/// Which rendering ends up as the document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// Detailed listing followed by the plain text.
    #[default]
    Combined,
    /// Only the per-block listing with confidences.
    Detailed,
    /// Only the recognized lines.
    Plain,
}

impl TextMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "combined" => Some(Self::Combined),
            "detailed" => Some(Self::Detailed),
            "plain" => Some(Self::Plain),
            _ => None,
        }
    }
}

/// The two views of a block list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedText {
    /// `[Block n] (conf: c): text`, one line per block.
    pub detailed: String,
    /// Block texts joined by newlines.
    pub plain: String,
}

impl FormattedText {
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.detailed.is_empty()
    }

    pub fn render(&self, mode: TextMode) -> String {
        if self.is_empty() {
            return String::new();
        }
        match mode {
            TextMode::Combined => format!(
                "{}\n\n{}\n{}",
                self.detailed, PLAIN_TEXT_HEADING, self.plain
            ),
            TextMode::Detailed => self.detailed.clone(),
            TextMode::Plain => self.plain.clone(),
        }
    }
}

/// Formats blocks into the detailed and plain views.
pub fn format_blocks(blocks: &[TextBlock]) -> FormattedText {
    if blocks.is_empty() {
        return FormattedText::default();
    }

    let detailed = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            format!(
                "[Block {}] (conf: {:.2}): {}",
                i + 1,
                block.confidence,
                block.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let plain = blocks
        .iter()
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    FormattedText { detailed, plain }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Vec<TextBlock> {
        vec![TextBlock::new("a", 0.9, 0), TextBlock::new("b", 0.8, 1)]
    }

    #[test]
    fn test_plain_view() {
        let formatted = format_blocks(&blocks());
        assert_eq!(formatted.plain, "a\nb");
        assert_eq!(formatted.render(TextMode::Plain), "a\nb");
    }

    #[test]
    fn test_detailed_view() {
        let formatted = format_blocks(&blocks());
        assert_eq!(
            formatted.detailed,
            "[Block 1] (conf: 0.90): a\n[Block 2] (conf: 0.80): b"
        );
    }

    #[test]
    fn test_combined_view() {
        let formatted = format_blocks(&blocks());
        assert_eq!(
            formatted.render(TextMode::Combined),
            "[Block 1] (conf: 0.90): a\n[Block 2] (conf: 0.80): b\n\n=== Plain Text ===\na\nb"
        );
    }

    #[test]
    fn test_no_blocks_renders_empty() {
        let formatted = format_blocks(&[]);
        assert!(formatted.is_empty());
        assert_eq!(formatted.render(TextMode::Combined), "");
        assert_eq!(formatted.render(TextMode::Detailed), "");
    }

    #[test]
    fn test_text_mode_from_name() {
        assert_eq!(TextMode::from_name("PLAIN"), Some(TextMode::Plain));
        assert_eq!(TextMode::from_name("combined"), Some(TextMode::Combined));
        assert_eq!(TextMode::from_name("fancy"), None);
    }
}
