//! Clustering error types.

use thiserror::Error;

/// Terminal failure of a clustering run.
///
/// A run either returns every topic or one of these; partial results are
/// never surfaced.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Embedding a message or seed title failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] flow_embeddings::EmbeddingError),

    /// Vector index upsert, query or persistence failed
    #[error("Index error: {0}")]
    Index(#[from] flow_vector::VectorError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
