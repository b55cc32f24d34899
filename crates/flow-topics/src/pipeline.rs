//! End-to-end clustering pipeline.
//!
//! `ingest` embeds and upserts every non-tool message, then saves the index.
//! Only after it returns does `cluster` extract seeds and partition. Upserts
//! always happen in message order so insertion-order tie-breaking stays
//! reproducible. Partitioning only ever sees the ids of the messages passed
//! in, even when a persistent index still holds earlier conversations.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use flow_embeddings::EmbeddingModel;
use flow_types::{ClusterConfig, Message};
use flow_vector::{RecordMetadata, VectorIndex};

use crate::error::ClusterError;
use crate::flow::{Flow, FlowBuilder};
use crate::partition::Partitioner;
use crate::seeds::SeedExtractor;
use crate::types::{Seed, Topic};

/// Statistics from the ingest phase
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Non-tool messages seen
    pub seen: usize,
    /// Messages embedded in this run
    pub embedded: usize,
    /// Messages whose stored record was reused without re-embedding
    pub reused: usize,
    /// Tool messages excluded from clustering
    pub skipped_tool: usize,
}

/// Output of a full run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub stats: IngestStats,
    pub seeds: Vec<Seed>,
    pub topics: Vec<Topic>,
    pub flows: Vec<Flow>,
}

/// Runs ingest, seed extraction and partitioning against a caller-owned index.
#[derive(Clone)]
pub struct ClusterPipeline {
    extractor: SeedExtractor,
    partitioner: Partitioner,
    embedder: Arc<dyn EmbeddingModel>,
}

impl ClusterPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingModel>,
        config: &ClusterConfig,
    ) -> Result<Self, ClusterError> {
        config.validate().map_err(ClusterError::InvalidConfig)?;
        Ok(Self {
            extractor: SeedExtractor::from_config(config),
            partitioner: Partitioner::new(embedder.clone(), config.neighbors),
            embedder,
        })
    }

    /// Embed and upsert every non-tool message, then persist the index.
    ///
    /// A record already stored with the same role and text is reused as is.
    /// Any embedding or index failure aborts the whole phase.
    pub fn ingest(
        &self,
        messages: &[Message],
        index: &mut dyn VectorIndex,
    ) -> Result<IngestStats, ClusterError> {
        let info = self.embedder.info();
        if info.dimension != index.dimension() {
            return Err(ClusterError::InvalidConfig(format!(
                "embedder dimension {} does not match index dimension {}",
                info.dimension,
                index.dimension()
            )));
        }
        if let Some(model) = index.model_name() {
            if model != info.name {
                return Err(ClusterError::InvalidConfig(format!(
                    "embedder {} does not match index built with {}",
                    info.name, model
                )));
            }
        }

        let mut stats = IngestStats::default();
        let mut pending: Vec<&Message> = Vec::new();

        for message in messages {
            if !message.is_clusterable() {
                stats.skipped_tool += 1;
                continue;
            }
            stats.seen += 1;
            pending.push(message);
        }

        for message in pending {
            let unchanged = index.get(&message.id).is_some_and(|r| {
                r.metadata.role == message.role && r.metadata.text == message.text
            });
            if unchanged {
                stats.reused += 1;
                debug!(id = %message.id, "Reusing stored embedding");
                continue;
            }

            let embedding = self.embedder.embed(&message.text)?;
            index.upsert(
                &message.id,
                embedding,
                RecordMetadata::new(message.role, message.text.clone()),
            )?;
            stats.embedded += 1;
        }

        index.save()?;

        info!(
            seen = stats.seen,
            embedded = stats.embedded,
            reused = stats.reused,
            skipped_tool = stats.skipped_tool,
            records = index.len(),
            "Ingest complete"
        );
        Ok(stats)
    }

    /// Seeds for `messages`, using the configured caps.
    pub fn extract_seeds(&self, messages: &[Message]) -> Vec<Seed> {
        self.extractor.extract(messages)
    }

    /// Ingest, then partition into disjoint topics (one per seed).
    pub fn cluster(
        &self,
        messages: &[Message],
        index: &mut dyn VectorIndex,
    ) -> Result<Vec<Topic>, ClusterError> {
        self.ingest(messages, index)?;
        let seeds = self.extract_seeds(messages);
        self.partitioner.partition(&seeds, index, &run_scope(messages))
    }

    /// Full run: ingest, seeds, topics and flows.
    pub fn run(
        &self,
        messages: &[Message],
        index: &mut dyn VectorIndex,
        builder: &FlowBuilder,
    ) -> Result<ClusterReport, ClusterError> {
        let stats = self.ingest(messages, index)?;
        let seeds = self.extract_seeds(messages);
        let topics = self
            .partitioner
            .partition(&seeds, index, &run_scope(messages))?;
        let flows = builder.build_flows(&topics);

        info!(seeds = seeds.len(), flows = flows.len(), "Clustering run complete");
        Ok(ClusterReport {
            stats,
            seeds,
            topics,
            flows,
        })
    }
}

/// Ids of the messages that take part in this run.
fn run_scope(messages: &[Message]) -> HashSet<&str> {
    messages
        .iter()
        .filter(|m| m.is_clusterable())
        .map(|m| m.id.as_str())
        .collect()
}

impl std::fmt::Debug for ClusterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterPipeline")
            .field("extractor", &self.extractor)
            .field("partitioner", &self.partitioner)
            .finish()
    }
}
