//! Splits document text into overlapping chunks for embedding.
//!
//! OCR output is line oriented, so after sentence ends (Latin and CJK
//! punctuation) the splitter prefers line breaks over word breaks.

use super::config::IndexConfig;

/// Sentence terminators followed by whitespace, in priority order.
const SENTENCE_BREAKS: &[&str] = &[". ", ".\n", "! ", "!\n", "? ", "?\n", "。", "！", "？"];

/// How far back from the target end a break point is searched for.
const BREAK_LOOKBACK: usize = 100;

/// A piece of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub content: String,
    /// Index of this chunk (0-based).
    pub index: usize,
    pub total: usize,
    /// Byte offsets into the trimmed source text.
    pub start_offset: usize,
    pub end_offset: usize,
}

impl TextChunk {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// Sliding-window chunker with boundary-aware cut points.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    min_chunk_size: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize, min_chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(50);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size / 2),
            min_chunk_size: min_chunk_size.min(chunk_size),
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap, config.min_chunk_size)
    }

    /// Splits text; blank input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if text.len() <= self.chunk_size {
            return vec![TextChunk {
                content: text.to_string(),
                index: 0,
                total: 1,
                start_offset: 0,
                end_offset: text.len(),
            }];
        }

        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let target = floor_boundary(text, (start + self.chunk_size).min(text.len()));
            let mut end = self.find_break_point(text, start, target);
            if end <= start {
                end = ceil_boundary(text, start + 1);
            }

            let piece = text[start..end].trim();
            let is_tail = end >= text.len();
            if !piece.is_empty() && (piece.len() >= self.min_chunk_size || is_tail) {
                chunks.push(TextChunk {
                    content: piece.to_string(),
                    index: chunks.len(),
                    total: 0,
                    start_offset: start,
                    end_offset: end,
                });
            }

            if is_tail {
                break;
            }

            let next = floor_boundary(text, end.saturating_sub(self.chunk_overlap));
            start = if next > start { next } else { end };
        }

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.total = total;
        }
        chunks
    }

    /// Picks a cut point at or before `target_end`, past `min_chunk_size`.
    fn find_break_point(&self, text: &str, start: usize, target_end: usize) -> usize {
        if target_end >= text.len() {
            return text.len();
        }

        let window_start = floor_boundary(text, target_end.saturating_sub(BREAK_LOOKBACK).max(start));
        let window = &text[window_start..target_end];
        let floor = start + self.min_chunk_size;

        let candidates = SENTENCE_BREAKS
            .iter()
            .filter_map(|pattern| window.rfind(pattern).map(|pos| pos + pattern.len()))
            .chain(window.rfind("\n\n").map(|pos| pos + 2))
            .chain(window.rfind('\n').map(|pos| pos + 1))
            .chain(window.rfind(' ').map(|pos| pos + 1));

        for offset in candidates {
            let abs = window_start + offset;
            if abs > floor {
                return abs;
            }
        }

        target_end
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&IndexConfig::default())
    }
}

/// Largest char boundary at or before `pos`.
fn floor_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Smallest char boundary at or after `pos`.
fn ceil_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}
