//! Error kinds returned by every database operation.

use thiserror::Error;

/// Error type produced by an [`Embedder`](crate::embed::Embedder) backend.
pub type EmbedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("ID not found: {0}")]
    NotFound(String),

    #[error("No embedding provider configured")]
    EmbeddingUnavailable,

    #[error("Embedding failed: {0}")]
    Embedding(#[source] EmbedError),

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Empty database")]
    EmptyStore,

    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
