//! # flow-types
//!
//! Shared domain types for flowsplit.
//!
//! This crate defines the data structures every other crate builds on:
//! - Messages: normalized conversation entries (role + text)
//! - Settings: layered configuration for the clustering pipeline
//!
//! ## Usage
//!
//! ```rust
//! use flow_types::{Message, Role};
//!
//! let msg = Message::new("1", Role::User, "Fix login bug\r\n");
//! assert_eq!(msg.text, "Fix login bug");
//! ```

pub mod config;
pub mod error;
pub mod message;

pub use config::{
    ClusterConfig, EmbeddingSettings, IndexBackend, MetricKind, Settings, DEFAULT_MAX_SEEDS,
    DEFAULT_MAX_TITLE_CHARS, DEFAULT_NEIGHBORS,
};
pub use error::FlowError;
pub use message::{normalize_messages, normalize_text, Message, RawContent, RawMessage, Role};
