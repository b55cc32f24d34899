//! Error types for flowsplit.

use thiserror::Error;

/// Unified error type for shared types and configuration.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
