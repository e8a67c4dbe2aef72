//! Embedding provider boundary.
//!
//! The database never picks a model. Text operations go through an
//! [`Embedder`] handed to it at construction time.
//!
//! - `HashEmbedder` gives deterministic hash-seeded vectors, enough for tests
//!   and for driving the text operations without a model.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::EmbedError;

/// Turns text into a vector.
///
/// Implementations may batch, cache or lazily load heavy resources, but the
/// same text must produce the same vector for the lifetime of the process.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

impl<F> Embedder for F
where
    F: Fn(&str) -> Result<Vec<f32>, EmbedError> + Send + Sync,
{
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self(text)
    }
}

/// Deterministic embedder deriving each component from a hash of the text.
///
/// Identical inputs always produce identical unit vectors. There is no
/// semantic similarity between different texts.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        HashEmbedder { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if self.dim == 0 {
            return Err("HashEmbedder dimension must be at least 1".into());
        }

        let mut result: Vec<f32> = (0..self.dim)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                i.hash(&mut hasher);
                let h = hasher.finish();
                (((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0) as f32
            })
            .collect();

        let norm = crate::vector::l2_norm(&result);
        if norm > 0.0 {
            for val in &mut result {
                *val /= norm;
            }
        }

        Ok(result)
    }
}
