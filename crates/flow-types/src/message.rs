//! Message type for exported conversation logs.
//!
//! Exports carry text in one of two fields (`text` or `content`) and may omit
//! ids. Everything is resolved here, once, so downstream crates only ever see
//! a [`Message`] with an id, a role and normalized text.

use serde::{Deserialize, Deserializer, Serialize};

/// Role of the message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// User input
    User,
    /// Assistant response
    Assistant,
    /// Tool invocation or result (never clustered)
    Tool,
    /// System prompts and anything unrecognized
    Other,
}

impl Role {
    /// Parse a role name case-insensitively. Unknown names map to [`Role::Other`].
    ///
    /// Accepts the chat-export aliases `human` (user) and `ai` (assistant).
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "user" | "human" => Role::User,
            "assistant" | "ai" => Role::Assistant,
            "tool" => Role::Tool,
            _ => Role::Other,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
            Role::Other => write!(f, "other"),
        }
    }
}

/// A normalized conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier (source id, or `msg-<index>` when the export had none)
    pub id: String,
    /// Role of the author
    pub role: Role,
    /// Normalized text
    pub text: String,
}

impl Message {
    /// Create a message, normalizing its text.
    pub fn new(id: impl Into<String>, role: Role, text: &str) -> Self {
        Self {
            id: id.into(),
            role,
            text: normalize_text(text),
        }
    }

    /// Build a message from a raw export entry at position `index`.
    pub fn from_raw(raw: RawMessage, index: usize) -> Self {
        let id = raw.id.unwrap_or_else(|| format!("msg-{}", index));
        let role = Role::parse(&raw.role);
        let text = raw
            .text
            .filter(|t| !t.trim().is_empty())
            .or_else(|| raw.content.map(RawContent::into_text))
            .unwrap_or_default();
        Self::new(id, role, &text)
    }

    /// Whether the message takes part in clustering (everything except tool output).
    pub fn is_clusterable(&self) -> bool {
        self.role != Role::Tool
    }
}

/// A message as it appears in an export, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    /// Optional id; numeric ids are accepted and stringified
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    /// Author role name
    #[serde(default)]
    pub role: String,
    /// Primary text field
    #[serde(default)]
    pub text: Option<String>,
    /// Alternate text field
    #[serde(default)]
    pub content: Option<RawContent>,
}

/// The alternate `content` field: a plain string or a list of text parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawContent {
    /// Plain string content
    Text(String),
    /// Structured content parts; only their `text` is kept
    Parts(Vec<ContentPart>),
}

impl RawContent {
    /// Flatten into a single string (parts joined by newlines).
    pub fn into_text(self) -> String {
        match self {
            RawContent::Text(text) => text,
            RawContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One part of structured content.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Normalize message text: unify line endings, strip trailing whitespace per
/// line and trim the whole text.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Normalize a full export, assigning positional ids where missing.
pub fn normalize_messages(raw: Vec<RawMessage>) -> Vec<Message> {
    raw.into_iter()
        .enumerate()
        .map(|(index, m)| Message::from_raw(m, index))
        .collect()
}
