//! Shared Claude parsing utilities.

use serde::Deserialize;
use serde_json::Value;

use super::RecordError;
use crate::chat::UNTITLED;
use crate::loader::Platform;
use crate::message::id_or_generate;
use crate::timestamp::parse_iso_datetime;
use crate::{Chat, Message, Role};

/// Raw Claude conversation record.
#[derive(Debug, Deserialize)]
pub struct ClaudeRawConversation {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// ISO 8601, usually with a `Z` suffix
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub chat_messages: Option<Vec<ClaudeRawMessage>>,
}

/// Raw Claude message.
#[derive(Debug, Deserialize)]
pub struct ClaudeRawMessage {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// `human`, `assistant`, or something newer
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Content blocks; only the first `text` block is used
    #[serde(default)]
    pub content: Option<Vec<Value>>,
}

/// Returns the message text: `text` when non-empty, otherwise the `text` of
/// the first content block whose type is `"text"`.
pub fn extract_claude_text(msg: &ClaudeRawMessage) -> &str {
    if let Some(text) = msg.text.as_deref().filter(|t| !t.is_empty()) {
        return text;
    }

    msg.content
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Maps a Claude sender to a role. Unknown senders become [`Role::System`].
pub fn map_claude_sender(sender: &str) -> Role {
    match sender {
        "human" => Role::User,
        "assistant" => Role::Assistant,
        _ => Role::System,
    }
}

/// Converts a raw Claude message. Returns `None` if it has no text.
pub fn parse_claude_message(msg: &ClaudeRawMessage) -> Option<Message> {
    let text = extract_claude_text(msg).trim();
    if text.is_empty() {
        return None;
    }

    let role = map_claude_sender(msg.sender.as_deref().unwrap_or_default());
    let mut message = Message::new(role, text).with_id(id_or_generate(msg.uuid.as_deref()));

    if let Some(ts) = msg.created_at.as_deref().and_then(parse_iso_datetime) {
        message = message.with_timestamp(ts);
    }

    Some(message)
}

/// Converts one raw Claude record into a chat.
///
/// Returns `Ok(None)` when no message has text.
///
/// # Errors
///
/// Returns [`RecordError`] if the record has the wrong shape.
pub fn parse_claude_conversation(
    record: Value,
    source_file: &str,
) -> Result<Option<Chat>, RecordError> {
    let raw: ClaudeRawConversation = serde_json::from_value(record)?;

    let messages: Vec<Message> = raw
        .chat_messages
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(parse_claude_message)
        .collect();

    if messages.is_empty() {
        return Ok(None);
    }

    let title = raw
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let mut chat = Chat::new(Platform::Claude, title)
        .with_id(id_or_generate(raw.uuid.as_deref()))
        .with_source_file(source_file)
        .with_messages(messages);

    if let Some(ts) = raw.created_at.as_deref().and_then(parse_iso_datetime) {
        chat = chat.with_created_at(ts);
    }
    if let Some(ts) = raw.updated_at.as_deref().and_then(parse_iso_datetime) {
        chat = chat.with_updated_at(ts);
    }

    Ok(Some(chat))
}
