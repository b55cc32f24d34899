//! # flow-topics
//!
//! Partitions a conversation into disjoint topical flows.
//!
//! The pipeline runs in two strictly ordered phases:
//! 1. Ingest: every non-tool message is embedded and upserted into the
//!    vector index. The phase ends with `save()`, and no query is issued
//!    before it completes.
//! 2. Partition: seeds are extracted from user messages; each seed queries
//!    the now-stable index in seed order and greedily claims the ids no
//!    earlier seed has claimed.
//!
//! Topics are then lifted into [`Flow`] records for downstream tooling.
//!
//! ## Features
//! - Seed extraction from user messages (bounded, order preserving)
//! - Greedy claim partitioning: topics are pairwise disjoint by construction
//! - Incremental ingest: unchanged messages already in a persisted index are
//!   not re-embedded
//! - Deterministic: no randomness anywhere in clustering

pub mod claim;
pub mod error;
pub mod flow;
pub mod partition;
pub mod pipeline;
pub mod seeds;
pub mod types;

pub use claim::ClaimSet;
pub use error::ClusterError;
pub use flow::{
    build_flows, Deliverable, DeliverableKind, Flow, FlowBuilder, FlowIdSource, FlowMetrics,
    FlowNode,
};
pub use partition::Partitioner;
pub use pipeline::{ClusterPipeline, ClusterReport, IngestStats};
pub use seeds::{seed_title, SeedExtractor};
pub use types::{Seed, Topic};
