//! File-backed vector index.
//!
//! Wraps a [`MemoryIndex`] and persists it as a single JSON snapshot
//! (`index.json`) so previously embedded messages survive across runs.
//! The snapshot keeps records in insertion order, which preserves
//! tie-breaking after a reload. It also names the embedding model, so
//! vectors from different models never end up in one index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use flow_embeddings::{Embedding, ModelInfo};

use crate::error::VectorError;
use crate::index::{IndexStats, RecordMetadata, SearchResult, VectorIndex, VectorRecord};
use crate::memory::MemoryIndex;
use crate::metric::SimilarityMetric;

/// Snapshot file name inside the index directory
pub const SNAPSHOT_FILE: &str = "index.json";

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    dimension: usize,
    model: String,
    metric: String,
    saved_at: DateTime<Utc>,
    records: Vec<VectorRecord>,
}

/// Persistent index stored under a directory.
#[derive(Debug)]
pub struct FileIndex {
    inner: MemoryIndex,
    model: String,
    index_dir: PathBuf,
}

impl FileIndex {
    /// Open the snapshot in `index_dir`, or start empty if there is none.
    ///
    /// A snapshot built with another model, dimension or metric is
    /// rejected rather than silently mixed with new vectors.
    pub fn open_or_create(
        index_dir: impl Into<PathBuf>,
        model: &ModelInfo,
        metric: Arc<dyn SimilarityMetric>,
    ) -> Result<Self, VectorError> {
        let index_dir = index_dir.into();
        let dimension = model.dimension;
        let snapshot_path = index_dir.join(SNAPSHOT_FILE);

        let inner = if snapshot_path.exists() {
            info!(path = ?snapshot_path, "Opening existing vector index");
            let bytes = std::fs::read(&snapshot_path)?;
            let snapshot: Snapshot = serde_json::from_slice(&bytes)?;

            if snapshot.version != SNAPSHOT_VERSION {
                return Err(VectorError::Snapshot(format!(
                    "unsupported snapshot version {}",
                    snapshot.version
                )));
            }
            if snapshot.dimension != dimension {
                return Err(VectorError::DimensionMismatch {
                    expected: dimension,
                    actual: snapshot.dimension,
                });
            }
            if snapshot.model != model.name {
                return Err(VectorError::ModelMismatch {
                    expected: model.name.clone(),
                    actual: snapshot.model,
                });
            }
            if snapshot.metric != metric.name() {
                return Err(VectorError::MetricMismatch {
                    expected: metric.name().to_string(),
                    actual: snapshot.metric,
                });
            }

            debug!(
                records = snapshot.records.len(),
                saved_at = %snapshot.saved_at,
                "Loaded snapshot"
            );
            MemoryIndex::from_records(dimension, metric, snapshot.records)?
        } else {
            info!(path = ?snapshot_path, dim = dimension, "Creating new vector index");
            MemoryIndex::with_metric(dimension, metric)
        };

        Ok(Self {
            inner,
            model: model.name.clone(),
            index_dir,
        })
    }

    /// Get the snapshot file path
    pub fn snapshot_file(&self) -> PathBuf {
        self.index_dir.join(SNAPSHOT_FILE)
    }

    /// Directory holding the snapshot
    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }
}

impl VectorIndex for FileIndex {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn metric_name(&self) -> &'static str {
        self.inner.metric_name()
    }

    fn model_name(&self) -> Option<&str> {
        Some(&self.model)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn upsert(
        &mut self,
        id: &str,
        embedding: Embedding,
        metadata: RecordMetadata,
    ) -> Result<(), VectorError> {
        self.inner.upsert(id, embedding, metadata)
    }

    fn query(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>, VectorError> {
        self.inner.query(query, k)
    }

    fn get(&self, id: &str) -> Option<&VectorRecord> {
        self.inner.get(id)
    }

    fn stats(&self) -> IndexStats {
        let size_bytes = std::fs::metadata(self.snapshot_file())
            .map(|m| m.len())
            .unwrap_or(0);

        IndexStats {
            size_bytes,
            persistent: true,
            ..self.inner.stats()
        }
    }

    /// Write the snapshot to a temp file, then rename it into place.
    fn save(&self) -> Result<(), VectorError> {
        std::fs::create_dir_all(&self.index_dir)?;

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            dimension: self.inner.dimension(),
            model: self.model.clone(),
            metric: self.inner.metric_name().to_string(),
            saved_at: Utc::now(),
            records: self.inner.records().to_vec(),
        };
        let bytes = serde_json::to_vec(&snapshot)?;

        let path = self.snapshot_file();
        let tmp_path = self.index_dir.join(format!("{}.tmp", SNAPSHOT_FILE));
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, &path)?;

        info!(path = ?path, records = self.inner.len(), "Saved vector index");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), VectorError> {
        self.inner.clear()?;
        let path = self.snapshot_file();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        info!(path = ?path, "Cleared vector index");
        Ok(())
    }
}
