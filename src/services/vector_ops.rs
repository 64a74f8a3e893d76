//! Vector operations on embeddings.

use rayon::prelude::*;

/// Utility struct for vector operations.
pub struct VectorOps;

impl VectorOps {
    /// Compute cosine similarity between two vectors.
    ///
    /// Returns 0.0 for mismatched lengths, empty input, or a zero vector.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }

        let dot_product: f32 = a.par_iter().zip(b.par_iter()).map(|(x, y)| x * y).sum();
        let norm_a = Self::l2_norm(a);
        let norm_b = Self::l2_norm(b);

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot_product / (norm_a * norm_b)
        }
    }

    pub fn l2_norm(vector: &[f32]) -> f32 {
        vector.par_iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Normalize a vector in-place to unit length. Zero vectors are left as is.
    pub fn normalize_inplace(vector: &mut [f32]) {
        let norm = Self::l2_norm(vector);
        if norm > 0.0 {
            vector.par_iter_mut().for_each(|x| *x /= norm);
        }
    }
}
