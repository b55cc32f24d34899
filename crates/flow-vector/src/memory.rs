//! In-process vector index.
//!
//! Records live in a `Vec` in insertion order, with an id -> position map
//! for upserts. Queries score every record, so results are exact.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use flow_embeddings::Embedding;

use crate::error::VectorError;
use crate::index::{IndexStats, RecordMetadata, SearchResult, VectorIndex, VectorRecord};
use crate::metric::{Cosine, SimilarityMetric};

/// Exact in-memory index.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    dimension: usize,
    metric: Arc<dyn SimilarityMetric>,
    records: Vec<VectorRecord>,
    positions: HashMap<String, usize>,
}

impl MemoryIndex {
    /// Create an empty cosine index.
    pub fn new(dimension: usize) -> Self {
        Self::with_metric(dimension, Arc::new(Cosine))
    }

    /// Create an empty index ranked by `metric`.
    pub fn with_metric(dimension: usize, metric: Arc<dyn SimilarityMetric>) -> Self {
        Self {
            dimension,
            metric,
            records: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Rebuild an index from records already in insertion order.
    pub fn from_records(
        dimension: usize,
        metric: Arc<dyn SimilarityMetric>,
        records: Vec<VectorRecord>,
    ) -> Result<Self, VectorError> {
        let mut index = Self::with_metric(dimension, metric);
        for record in records {
            index.upsert(&record.id, record.embedding, record.metadata)?;
        }
        Ok(index)
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }

    fn check_dimension(&self, embedding: &Embedding) -> Result<(), VectorError> {
        if embedding.dimension() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.dimension(),
            });
        }
        Ok(())
    }
}

impl VectorIndex for MemoryIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn metric_name(&self) -> &'static str {
        self.metric.name()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn upsert(
        &mut self,
        id: &str,
        embedding: Embedding,
        metadata: RecordMetadata,
    ) -> Result<(), VectorError> {
        if id.is_empty() {
            return Err(VectorError::InvalidId(id.to_string()));
        }
        self.check_dimension(&embedding)?;

        let record = VectorRecord {
            id: id.to_string(),
            embedding,
            metadata,
        };

        match self.positions.get(id) {
            Some(&pos) => {
                self.records[pos] = record;
                debug!(id = id, "Overwrote record");
            }
            None => {
                self.positions.insert(id.to_string(), self.records.len());
                self.records.push(record);
                debug!(id = id, "Inserted record");
            }
        }
        Ok(())
    }

    fn query(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>, VectorError> {
        if k == 0 || self.records.is_empty() {
            return Ok(Vec::new());
        }
        self.check_dimension(query)?;

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, r)| (pos, self.metric.score(&query.values, &r.embedding.values)))
            .collect();

        // Descending score, then ascending insertion position
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        let results: Vec<SearchResult> = scored
            .into_iter()
            .map(|(pos, score)| SearchResult::new(self.records[pos].id.clone(), score))
            .collect();

        debug!(k = k, found = results.len(), "Query complete");
        Ok(results)
    }

    fn get(&self, id: &str) -> Option<&VectorRecord> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            record_count: self.records.len(),
            dimension: self.dimension,
            metric: self.metric.name().to_string(),
            size_bytes: 0,
            persistent: false,
        }
    }

    fn save(&self) -> Result<(), VectorError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), VectorError> {
        self.records.clear();
        self.positions.clear();
        Ok(())
    }
}
