//! Recognized text blocks.

use serde::{Deserialize, Serialize};

/// Quadrilateral around a text region: four `[x, y]` corners, clockwise from
/// the top-left one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox(pub [[f32; 2]; 4]);

impl BoundingBox {
    /// Builds an axis-aligned box from a pixel rectangle.
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        let right = left + width;
        let bottom = top + height;
        Self([[left, top], [right, top], [right, bottom], [left, bottom]])
    }

    pub fn points(&self) -> &[[f32; 2]; 4] {
        &self.0
    }

    /// Smallest axis-aligned rectangle `(left, top, right, bottom)` containing the box.
    pub fn extent(&self) -> (f32, f32, f32, f32) {
        let xs = self.0.iter().map(|p| p[0]);
        let ys = self.0.iter().map(|p| p[1]);
        (
            xs.clone().fold(f32::INFINITY, f32::min),
            ys.clone().fold(f32::INFINITY, f32::min),
            xs.fold(f32::NEG_INFINITY, f32::max),
            ys.fold(f32::NEG_INFINITY, f32::max),
        )
    }
}

/// One recognized piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
    pub bbox: Option<BoundingBox>,
    /// Position of the block in the engine's output.
    pub block_index: usize,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, confidence: f32, block_index: usize) -> Self {
        Self {
            text: text.into(),
            confidence,
            bbox: None,
            block_index,
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }
}
