//! Claude export loader.

use crate::error::Result;
use crate::loader::{ChatStream, Loader, Platform};
use crate::parsing::claude::parse_claude_conversation;
use crate::parsing::decode_records;

use super::stream_records;

const FORMAT: &str = "Claude JSON";

/// Loader for Claude `conversations.json` exports.
///
/// Claude exports are a flat list per conversation:
/// ```json
/// [
///   {
///     "uuid": "...",
///     "name": "Conversation Title",
///     "created_at": "2024-01-15T10:30:00.000000Z",
///     "updated_at": "2024-01-15T11:00:00.000000Z",
///     "chat_messages": [
///       {
///         "uuid": "...",
///         "text": "...",
///         "sender": "human",
///         "created_at": "2024-01-15T10:30:00.000000Z",
///         "content": [{"type": "text", "text": "..."}]
///       }
///     ]
///   }
/// ]
/// ```
pub struct ClaudeLoader;

impl ClaudeLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClaudeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for ClaudeLoader {
    fn name(&self) -> &'static str {
        "Claude"
    }

    fn platform(&self) -> Platform {
        Platform::Claude
    }

    fn load_str(&self, content: &str, source_file: &str) -> Result<ChatStream> {
        let records = decode_records(content, FORMAT)?;
        Ok(stream_records(
            records,
            source_file,
            FORMAT,
            &["name", "uuid"],
            parse_claude_conversation,
        ))
    }

    fn count_str(&self, content: &str) -> Result<usize> {
        Ok(decode_records(content, FORMAT)?.len())
    }
}
