//! Mock OCR engine for testing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use super::engine::{OcrEngine, RawOcrOutput};

/// Returns canned outputs keyed by file name, without touching the image.
pub struct MockOcrEngine {
    outputs: HashMap<String, RawOcrOutput>,
    fallback: RawOcrOutput,
    failing: Vec<String>,
    language: String,
    calls: AtomicUsize,
}

impl MockOcrEngine {
    pub fn new() -> Self {
        Self {
            outputs: HashMap::new(),
            fallback: RawOcrOutput::empty(),
            failing: Vec::new(),
            language: "eng".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Registers the output for a file name.
    pub fn with_output(mut self, file_name: &str, output: RawOcrOutput) -> Self {
        self.outputs.insert(file_name.to_string(), output);
        self
    }

    /// Output for files without a registered entry.
    pub fn with_fallback(mut self, output: RawOcrOutput) -> Self {
        self.fallback = output;
        self
    }

    /// Makes recognition fail for a file name.
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing.push(file_name.to_string());
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Number of `recognize` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockOcrEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn recognize(&self, path: &Path) -> Result<RawOcrOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if self.failing.contains(&file_name) {
            anyhow::bail!("Mock engine configured to fail on {}", file_name);
        }

        Ok(self
            .outputs
            .get(&file_name)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-ocr"
    }

    fn language(&self) -> &str {
        &self.language
    }
}
