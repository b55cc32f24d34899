//! Conversation export loading.
//!
//! Accepts either a bare JSON array of messages or an object with a
//! `messages` array.

use std::path::Path;

use serde::Deserialize;

use flow_types::{normalize_messages, FlowError, Message, RawMessage};

#[derive(Deserialize)]
#[serde(untagged)]
enum ExportFile {
    Messages(Vec<RawMessage>),
    Wrapped { messages: Vec<RawMessage> },
}

/// Parse export JSON into normalized messages.
pub fn parse_export(json: &str) -> Result<Vec<Message>, FlowError> {
    let export: ExportFile = serde_json::from_str(json).map_err(|e| {
        FlowError::InvalidInput(format!(
            "expected a message array or an object with `messages`: {}",
            e
        ))
    })?;

    let raw = match export {
        ExportFile::Messages(messages) => messages,
        ExportFile::Wrapped { messages } => messages,
    };
    Ok(normalize_messages(raw))
}

/// Read and parse an export file.
pub fn load_export(path: &Path) -> anyhow::Result<Vec<Message>> {
    use anyhow::Context;

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read export {:?}", path))?;
    let messages =
        parse_export(&json).with_context(|| format!("Failed to parse export {:?}", path))?;
    Ok(messages)
}
