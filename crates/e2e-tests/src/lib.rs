//! End-to-end test infrastructure for flowsplit.
//!
//! Provides a shared TestHarness and message fixtures for E2E tests
//! covering the full ingest-to-flow pipeline.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flow_embeddings::{EmbeddingModel, HashingEmbedder};
use flow_topics::{ClusterPipeline, Topic};
use flow_types::{ClusterConfig, IndexBackend, Message, MetricKind, Role, Settings};
use flow_vector::{metric_for, FileIndex, MemoryIndex};

/// Embedding dimension used by every fixture.
pub const TEST_DIMENSION: usize = 384;

/// Shared test harness for E2E tests.
///
/// Owns a temp directory for file-backed indexes and export files.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Directory for the file-backed index
    pub index_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let index_path = temp_dir.path().join("index");

        Self {
            _temp_dir: temp_dir,
            index_path,
        }
    }

    /// Open (or reopen) the file-backed index under this harness.
    pub fn file_index(&self) -> FileIndex {
        FileIndex::open_or_create(
            &self.index_path,
            embedder().info(),
            metric_for(MetricKind::Cosine),
        )
        .expect("Failed to open file index")
    }

    /// Settings pointing the `file` backend at this harness.
    pub fn file_settings(&self) -> Settings {
        Settings {
            index_backend: IndexBackend::File,
            index_path: self.index_path.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    /// Write `json` as an export file and return its path.
    pub fn write_export(&self, name: &str, json: &str) -> PathBuf {
        let path = self._temp_dir.path().join(name);
        std::fs::write(&path, json).expect("Failed to write export");
        path
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The shared hashing embedder.
pub fn embedder() -> Arc<dyn EmbeddingModel> {
    Arc::new(HashingEmbedder::new(TEST_DIMENSION).expect("Failed to create embedder"))
}

/// Pipeline with default caps.
pub fn pipeline() -> ClusterPipeline {
    pipeline_with(ClusterConfig::default())
}

/// Pipeline with custom caps.
pub fn pipeline_with(config: ClusterConfig) -> ClusterPipeline {
    ClusterPipeline::new(embedder(), &config).expect("Failed to create pipeline")
}

/// Fresh in-memory index.
pub fn memory_index() -> MemoryIndex {
    MemoryIndex::new(TEST_DIMENSION)
}

/// The three-message login conversation.
pub fn login_scenario() -> Vec<Message> {
    vec![
        Message::new("1", Role::User, "Fix login bug"),
        Message::new("2", Role::Assistant, "Here's a fix"),
        Message::new("3", Role::User, "Fix login bug again"),
    ]
}

/// A conversation touching three unrelated subjects, interleaved.
pub fn mixed_conversation() -> Vec<Message> {
    vec![
        Message::new("u1", Role::User, "Postgres migration fails on the users table"),
        Message::new("a1", Role::Assistant, "Check the postgres migration order for the users table"),
        Message::new("u2", Role::User, "Button colors look wrong in dark mode"),
        Message::new("t1", Role::Tool, "exit code 0"),
        Message::new("a2", Role::Assistant, "Dark mode button colors come from the theme file"),
        Message::new("u3", Role::User, "Deploy the service to staging"),
        Message::new("a3", Role::Assistant, "Staging deploy uses the service manifest"),
    ]
}

const VOCABULARY: &[&str] = &[
    "login", "session", "token", "database", "migration", "schema", "button", "layout",
    "theme", "deploy", "staging", "cluster", "cache", "latency", "query", "index", "parser",
    "error", "retry", "timeout", "upload", "storage", "metrics", "dashboard",
];

/// Random conversation of `count` messages, reproducible from `seed`.
///
/// Roles are drawn from user, assistant and tool; ids are `m0`, `m1`, ...
pub fn random_messages(seed: u64, count: usize) -> Vec<Message> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let role = match rng.random_range(0..4) {
                0 | 1 => Role::User,
                2 => Role::Assistant,
                _ => Role::Tool,
            };
            let words = rng.random_range(1..8);
            let text = (0..words)
                .map(|_| VOCABULARY[rng.random_range(0..VOCABULARY.len())])
                .collect::<Vec<_>>()
                .join(" ");
            Message::new(format!("m{}", i), role, &text)
        })
        .collect()
}

/// Number of messages that take part in clustering.
pub fn clusterable_count(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.is_clusterable()).count()
}

/// Panic if any id appears in more than one topic (or twice in one).
pub fn assert_disjoint(topics: &[Topic]) {
    let mut seen = HashSet::new();
    for topic in topics {
        for id in &topic.ids {
            assert!(
                seen.insert(id.as_str()),
                "id {} assigned twice (topic {:?})",
                id,
                topic.title
            );
        }
    }
}

/// Total ids assigned across all topics.
pub fn assigned_count(topics: &[Topic]) -> usize {
    topics.iter().map(|t| t.ids.len()).sum()
}
