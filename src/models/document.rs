use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Free-form document metadata, a JSON object.
pub type Metadata = serde_json::Map<String, Value>;

/// A unit of text handed to the index, with the metadata describing its origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub text: String,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(text: String, metadata: Metadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Creates a document without metadata.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text.into(), Metadata::new())
    }

    /// Inserts (or replaces) one metadata entry.
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(Value::as_f64)
    }

    pub fn metadata_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(Value::as_u64)
    }

    /// First `max_chars` characters of the text, with an ellipsis when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.text.chars().count() <= max_chars {
            return self.text.clone();
        }
        let cut: String = self.text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
