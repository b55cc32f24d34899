//! Seed extraction.
//!
//! Seeds come only from user messages, in original order. The title is the
//! first line of the message text truncated to `max_title_chars`; messages
//! whose title comes out empty are skipped and do not count toward the cap.

use flow_types::{ClusterConfig, Message, Role};

use crate::types::Seed;

/// Selects a bounded, ordered set of topic seeds.
#[derive(Debug, Clone)]
pub struct SeedExtractor {
    max_seeds: usize,
    max_title_chars: usize,
}

impl SeedExtractor {
    pub fn new(max_seeds: usize, max_title_chars: usize) -> Self {
        Self {
            max_seeds,
            max_title_chars,
        }
    }

    pub fn from_config(config: &ClusterConfig) -> Self {
        Self::new(config.max_seeds, config.max_title_chars)
    }

    /// Extract at most `max_seeds` seeds from user messages.
    pub fn extract(&self, messages: &[Message]) -> Vec<Seed> {
        messages
            .iter()
            .filter(|m| m.role == Role::User)
            .filter_map(|m| seed_title(&m.text, self.max_title_chars).map(|t| Seed::new(&m.id, t)))
            .take(self.max_seeds)
            .collect()
    }
}

impl Default for SeedExtractor {
    fn default() -> Self {
        Self::from_config(&ClusterConfig::default())
    }
}

/// First line of `text`, truncated to `max_chars` characters.
/// Returns `None` when the result is empty.
pub fn seed_title(text: &str, max_chars: usize) -> Option<String> {
    let first_line = text.lines().next().unwrap_or("").trim();
    let title: String = first_line.chars().take(max_chars).collect();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}
