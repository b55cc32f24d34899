//! Vector index trait and types.
//!
//! Defines the interface for upsert and k-nearest-neighbor queries.

use serde::{Deserialize, Serialize};

use flow_embeddings::Embedding;
use flow_types::Role;

use crate::error::VectorError;

/// Metadata stored alongside each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Role of the message author
    pub role: Role,
    /// Text that was embedded
    pub text: String,
}

impl RecordMetadata {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// A stored record. Keyed uniquely by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Embedding,
    pub metadata: RecordMetadata,
}

/// Result of a vector query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Record id
    pub id: String,
    /// Similarity score (higher = more similar)
    pub score: f32,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Index statistics
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Number of records in the index
    pub record_count: usize,
    /// Embedding dimension
    pub dimension: usize,
    /// Similarity metric name
    pub metric: String,
    /// Snapshot file size in bytes (0 for in-memory)
    pub size_bytes: u64,
    /// Whether the index survives the process
    pub persistent: bool,
}

/// Trait for vector indexes.
///
/// Query results are sorted by descending score; equal scores keep
/// insertion order (first inserted wins).
pub trait VectorIndex: Send + Sync {
    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Name of the similarity metric
    fn metric_name(&self) -> &'static str;

    /// Embedding model the stored vectors came from, when the backend
    /// records it
    fn model_name(&self) -> Option<&str> {
        None
    }

    /// Get the number of records in the index
    fn len(&self) -> usize;

    /// Check if the index is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a record, or overwrite the record already stored for `id`.
    /// An overwritten record keeps its original insertion position.
    fn upsert(
        &mut self,
        id: &str,
        embedding: Embedding,
        metadata: RecordMetadata,
    ) -> Result<(), VectorError>;

    /// Return at most `k` records most similar to `query`.
    /// An empty index or `k == 0` yields an empty result.
    fn query(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>, VectorError>;

    /// Look up a record by id
    fn get(&self, id: &str) -> Option<&VectorRecord>;

    /// Check if a record exists
    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Get index statistics
    fn stats(&self) -> IndexStats;

    /// Persist the index (no-op for in-memory backends)
    fn save(&self) -> Result<(), VectorError>;

    /// Remove every record
    fn clear(&mut self) -> Result<(), VectorError>;
}
