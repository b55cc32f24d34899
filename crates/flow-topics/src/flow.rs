//! Flow records built from topics.
//!
//! A flow is the structural wrapper downstream tooling attaches
//! deliverables and quality metrics to. Building one never inspects message
//! content.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::types::Topic;

/// Kind of deliverable attached to a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableKind {
    Docs,
    Prompt,
    Code,
    Other,
}

/// Generated artifact attached by an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub kind: DeliverableKind,
    pub name: String,
    pub content: String,
}

/// Member references of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub msg_ids: Vec<String>,
}

/// Flow metrics. `quality` stays `None` until a scorer fills it in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMetrics {
    pub message_count: usize,
    pub quality: Option<f64>,
}

/// One topical flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub title: String,
    pub nodes: Vec<FlowNode>,
    pub deliverables: Vec<Deliverable>,
    pub metrics: FlowMetrics,
}

impl Flow {
    /// All member message ids, across nodes.
    pub fn message_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .flat_map(|n| n.msg_ids.iter().map(String::as_str))
    }

    pub fn message_count(&self) -> usize {
        self.nodes.iter().map(|n| n.msg_ids.len()).sum()
    }

    /// Append a deliverable, keeping attachment order.
    pub fn add_deliverable(
        &mut self,
        kind: DeliverableKind,
        name: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.deliverables.push(Deliverable {
            kind,
            name: name.into(),
            content: content.into(),
        });
    }

    pub fn set_quality(&mut self, quality: f64) {
        self.metrics.quality = Some(quality);
    }
}

/// Where flow identifiers come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowIdSource {
    /// `flow-<ULID>`, unique across runs
    #[default]
    Ulid,
    /// `<prefix>-1`, `<prefix>-2`, ... restarting every build
    Sequential { prefix: String },
}

/// Lifts topics into flows.
#[derive(Debug, Clone, Default)]
pub struct FlowBuilder {
    id_source: FlowIdSource,
}

impl FlowBuilder {
    pub fn new(id_source: FlowIdSource) -> Self {
        Self { id_source }
    }

    /// Builder producing `<prefix>-N` ids.
    pub fn sequential(prefix: impl Into<String>) -> Self {
        Self::new(FlowIdSource::Sequential {
            prefix: prefix.into(),
        })
    }

    /// One flow per topic, in topic order.
    pub fn build_flows(&self, topics: &[Topic]) -> Vec<Flow> {
        topics
            .iter()
            .enumerate()
            .map(|(i, topic)| Flow {
                id: self.flow_id(i + 1),
                title: topic.title.clone(),
                nodes: vec![FlowNode {
                    msg_ids: topic.ids.clone(),
                }],
                deliverables: Vec::new(),
                metrics: FlowMetrics {
                    message_count: topic.ids.len(),
                    quality: None,
                },
            })
            .collect()
    }

    fn flow_id(&self, ordinal: usize) -> String {
        match &self.id_source {
            FlowIdSource::Ulid => format!("flow-{}", Ulid::new()),
            FlowIdSource::Sequential { prefix } => format!("{}-{}", prefix, ordinal),
        }
    }
}

/// Build flows with freshly generated ULID identifiers.
pub fn build_flows(topics: &[Topic]) -> Vec<Flow> {
    FlowBuilder::default().build_flows(topics)
}
