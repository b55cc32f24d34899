//! # flow-embeddings
//!
//! Local embedding generation for flowsplit.
//!
//! Embeddings are produced by hashing salient tokens (and adjacent token
//! pairs) into a fixed number of buckets. The result is deterministic and
//! needs no model files, network or external process: texts sharing more
//! vocabulary and phrasing land closer under cosine similarity.
//!
//! ## Features
//! - `EmbeddingModel` trait shared by every embedder
//! - `HashingEmbedder`: signed feature hashing over unigrams and bigrams
//! - Stop-word aware tokenizer

pub mod error;
pub mod hashing;
pub mod model;
pub mod tokenize;

pub use error::EmbeddingError;
pub use hashing::HashingEmbedder;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
pub use tokenize::tokenize;
