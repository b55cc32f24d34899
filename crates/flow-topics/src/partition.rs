//! Greedy disjoint partitioning.
//!
//! For each seed, in seed order:
//! 1. Embed the seed title and query the index for the top `neighbors`
//!    records that belong to the current run.
//! 2. Candidates are the seed id followed by neighbor ids (descending
//!    similarity), deduplicated.
//! 3. The topic keeps the candidates nobody has claimed yet, and claims them.
//!
//! The claim set is shared by every seed of the run, so topics are disjoint
//! by construction. Seeds must be processed sequentially.
//!
//! A persistent index may still hold records from earlier runs. Those are
//! outside the run's scope and are never returned as neighbors, so every
//! assigned id comes from the current input.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use flow_embeddings::EmbeddingModel;
use flow_vector::{SearchResult, VectorIndex};

use crate::claim::ClaimSet;
use crate::error::ClusterError;
use crate::types::{Seed, Topic};

/// Turns seeds plus a fully ingested index into disjoint topics.
#[derive(Clone)]
pub struct Partitioner {
    embedder: Arc<dyn EmbeddingModel>,
    neighbors: usize,
}

impl Partitioner {
    pub fn new(embedder: Arc<dyn EmbeddingModel>, neighbors: usize) -> Self {
        Self {
            embedder,
            neighbors,
        }
    }

    /// Partition the run's messages into one topic per seed, in seed order.
    ///
    /// `scope` holds the ids ingested for this run and must all be present
    /// in `index`. A topic may come out empty when earlier seeds claimed all
    /// of its candidates.
    pub fn partition(
        &self,
        seeds: &[Seed],
        index: &dyn VectorIndex,
        scope: &HashSet<&str>,
    ) -> Result<Vec<Topic>, ClusterError> {
        let mut claims = ClaimSet::new();
        let mut topics = Vec::with_capacity(seeds.len());

        // Enough results that `neighbors` in-scope ones survive the filter
        let stale = index.len().saturating_sub(scope.len());
        let fetch = self.neighbors.saturating_add(stale);

        for seed in seeds {
            let query = self.embedder.embed(&seed.title)?;
            let neighbors: Vec<SearchResult> = index
                .query(&query, fetch)?
                .into_iter()
                .filter(|n| scope.contains(n.id.as_str()))
                .take(self.neighbors)
                .collect();

            let mut seen = HashSet::with_capacity(neighbors.len() + 1);
            let candidates = std::iter::once(seed.id.as_str())
                .chain(neighbors.iter().map(|n| n.id.as_str()))
                .filter(|id| seen.insert(*id));

            let ids: Vec<String> = candidates
                .filter(|id| claims.claim(id))
                .map(String::from)
                .collect();

            debug!(
                seed = %seed.id,
                neighbors = neighbors.len(),
                claimed = ids.len(),
                "Partitioned seed"
            );

            topics.push(Topic {
                title: seed.title.clone(),
                seed_id: seed.id.clone(),
                ids,
            });
        }

        info!(
            topics = topics.len(),
            assigned = claims.len(),
            stale_records = stale,
            "Partition complete"
        );
        debug!(claimed = ?claims.claimed(), "Claim order");
        Ok(topics)
    }
}

impl std::fmt::Debug for Partitioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partitioner")
            .field("model", &self.embedder.info().name)
            .field("neighbors", &self.neighbors)
            .finish()
    }
}
