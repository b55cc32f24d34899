//! Seed and topic types.

use serde::{Deserialize, Serialize};

/// A candidate topic anchor derived from a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Source message id
    pub id: String,
    /// First line of the message, truncated
    pub title: String,
}

impl Seed {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A group of message ids anchored on one seed.
///
/// Within one run, the `ids` of all topics are pairwise disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Seed title
    pub title: String,
    /// Id of the seed message
    pub seed_id: String,
    /// Member message ids: seed first (when claimed), then neighbors by
    /// descending similarity
    pub ids: Vec<String>,
}

impl Topic {
    /// Whether every candidate was claimed by an earlier topic.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of member messages.
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
