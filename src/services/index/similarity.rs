//! Similarity ranking over embedding vectors.

use std::cmp::Ordering;

use crate::models::EmbeddingVector;

/// Computes cosine similarity between two embedding vectors.
pub fn cosine_similarity(a: &EmbeddingVector, b: &EmbeddingVector) -> f32 {
    a.cosine_similarity(b)
}

/// Finds the k candidates most similar to `query`, best first.
///
/// Returns `(candidate index, similarity)` pairs; ties keep input order.
pub fn find_k_most_similar(
    query: &EmbeddingVector,
    candidates: &[&EmbeddingVector],
    k: usize,
) -> Vec<(usize, f32)> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut similarities: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| (idx, cosine_similarity(query, c)))
        .collect();

    similarities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    similarities.truncate(k);
    similarities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmbeddingModel;

    fn vector(values: &[f32]) -> EmbeddingVector {
        EmbeddingVector::new(values.to_vec(), EmbeddingModel::BaaiBgeSmall)
    }

    #[test]
    fn test_find_k_most_similar() {
        let query = vector(&[1.0, 0.0]);
        let a = vector(&[0.0, 1.0]);
        let b = vector(&[1.0, 0.1]);
        let c = vector(&[0.7, 0.7]);

        let ranked = find_k_most_similar(&query, &[&a, &b, &c], 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 1);
        assert_eq!(ranked[1].0, 2);
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn test_find_k_more_than_available() {
        let query = vector(&[1.0, 0.0]);
        let a = vector(&[1.0, 0.0]);

        assert_eq!(find_k_most_similar(&query, &[&a], 5).len(), 1);
        assert!(find_k_most_similar(&query, &[], 5).is_empty());
        assert!(find_k_most_similar(&query, &[&a], 0).is_empty());
    }
}
