//! Embedding error types.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Invalid embedder configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
