use serde::{Deserialize, Serialize};

/// Supported embedding models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddingModel {
    /// Nomic Embed Text v1.5 (768 dimensions)
    NomicEmbedTextV15,
    /// BAAI BGE Small (384 dimensions)
    BaaiBgeSmall,
    /// Sentence Transformers all-MiniLM-L6-v2 (384 dimensions)
    AllMiniLmL6V2,
    /// Custom model, dimension must be supplied by the provider
    Custom(String),
}

impl EmbeddingModel {
    /// Expected vector dimension
    pub fn dimension(&self) -> usize {
        match self {
            EmbeddingModel::NomicEmbedTextV15 => 768,
            EmbeddingModel::BaaiBgeSmall => 384,
            EmbeddingModel::AllMiniLmL6V2 => 384,
            EmbeddingModel::Custom(_) => 0,
        }
    }

    /// Hub name of the model
    pub fn model_name(&self) -> &str {
        match self {
            EmbeddingModel::NomicEmbedTextV15 => "nomic-ai/nomic-embed-text-v1.5",
            EmbeddingModel::BaaiBgeSmall => "BAAI/bge-small-en-v1.5",
            EmbeddingModel::AllMiniLmL6V2 => "sentence-transformers/all-MiniLM-L6-v2",
            EmbeddingModel::Custom(name) => name,
        }
    }

    /// Parses the short names accepted in `EMBEDDING_MODEL`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "nomic-embed-text-v1.5" => EmbeddingModel::NomicEmbedTextV15,
            "bge-small-en-v1.5" => EmbeddingModel::BaaiBgeSmall,
            "all-MiniLM-L6-v2" => EmbeddingModel::AllMiniLmL6V2,
            other => EmbeddingModel::Custom(other.to_string()),
        }
    }
}

/// Embedding vector tagged with the model that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingVector {
    pub vector: Vec<f32>,
    pub model: EmbeddingModel,
    pub dimension: usize,
}

impl EmbeddingVector {
    pub fn new(vector: Vec<f32>, model: EmbeddingModel) -> Self {
        let dimension = vector.len();
        Self {
            vector,
            model,
            dimension,
        }
    }

    /// Cosine similarity; 0.0 when dimensions differ or either vector is zero.
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> f32 {
        if self.dimension != other.dimension {
            return 0.0;
        }

        let dot_product: f32 = self
            .vector
            .iter()
            .zip(other.vector.iter())
            .map(|(a, b)| a * b)
            .sum();

        let norm_a: f32 = self.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.vector.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Scales the vector to unit length.
    pub fn normalize(&mut self) {
        let norm: f32 = self.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut self.vector {
                *value /= norm;
            }
        }
    }

    pub fn is_normalized(&self) -> bool {
        let norm: f32 = self.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        (norm - 1.0).abs() < 1e-5
    }
}
