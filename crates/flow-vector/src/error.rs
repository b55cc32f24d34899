//! Vector index error types.

use thiserror::Error;

/// Errors that can occur during vector operations.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Persisted index was built with another metric
    #[error("Metric mismatch: expected {expected}, got {actual}")]
    MetricMismatch { expected: String, actual: String },

    /// Persisted index was built with another embedding model
    #[error("Model mismatch: expected {expected}, got {actual}")]
    ModelMismatch { expected: String, actual: String },

    /// Record id rejected
    #[error("Invalid record id: {0:?}")]
    InvalidId(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file is unreadable or from an unsupported version
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}
