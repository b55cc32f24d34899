//! Claimed-id bookkeeping for greedy partitioning.

use std::collections::HashSet;

/// Ids already assigned to a topic during one run.
///
/// Keeps claim order explicitly in a `Vec`; the `HashSet` only answers
/// membership. One `ClaimSet` belongs to exactly one clustering run.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`. Returns `false` if it was already claimed.
    pub fn claim(&mut self, id: &str) -> bool {
        if self.members.contains(id) {
            return false;
        }
        self.members.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    /// Claimed ids in the order they were claimed.
    pub fn claimed(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
