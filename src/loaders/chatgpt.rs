//! ChatGPT export loader.

use crate::error::Result;
use crate::loader::{ChatStream, Loader, Platform};
use crate::parsing::chatgpt::parse_chatgpt_conversation;
use crate::parsing::decode_records;

use super::stream_records;

const FORMAT: &str = "ChatGPT JSON";

/// Loader for ChatGPT `conversations.json` exports.
///
/// ChatGPT stores each conversation as a tree:
/// ```json
/// [
///   {
///     "id": "...",
///     "title": "Conversation Title",
///     "create_time": 1767964319.930,
///     "update_time": 1768151469.680,
///     "mapping": {
///       "node-1": {
///         "parent": null,
///         "children": ["node-2", "node-3"],
///         "message": {
///           "id": "...",
///           "author": {"role": "user"},
///           "content": {"content_type": "text", "parts": ["..."]},
///           "create_time": 1767964320.1,
///           "metadata": {"model_slug": "gpt-4o"}
///         }
///       }
///     }
///   }
/// ]
/// ```
///
/// Only the primary thread is kept: from the root, always the first child.
pub struct ChatGptLoader;

impl ChatGptLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChatGptLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for ChatGptLoader {
    fn name(&self) -> &'static str {
        "ChatGPT"
    }

    fn platform(&self) -> Platform {
        Platform::ChatGpt
    }

    fn load_str(&self, content: &str, source_file: &str) -> Result<ChatStream> {
        let records = decode_records(content, FORMAT)?;
        Ok(stream_records(
            records,
            source_file,
            FORMAT,
            &["title", "id", "conversation_id"],
            parse_chatgpt_conversation,
        ))
    }

    fn count_str(&self, content: &str) -> Result<usize> {
        Ok(decode_records(content, FORMAT)?.len())
    }
}
