//! Shared parsing utilities for all platforms.
//!
//! This module holds the raw export structures and the record-to-chat
//! conversion logic used by the loaders, plus the helpers every loader needs
//! to split a file into records.

pub mod chatgpt;
pub mod claude;

use serde_json::Value;
use thiserror::Error;

use crate::error::{ChatmillError, Result};

// Re-export commonly used items
pub use chatgpt::{ChatGptRawConversation, ChatGptRawNode, extract_chatgpt_text, primary_thread};
pub use claude::{ClaudeRawConversation, ClaudeRawMessage, extract_claude_text, map_claude_sender};

/// A single conversation record that could not be converted.
///
/// Never escapes a loader: the record is logged and skipped.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record does not have the expected shape
    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decodes export content into its top-level records.
///
/// # Errors
///
/// Returns [`ChatmillError::Parse`] if the content is not JSON and
/// [`ChatmillError::InvalidFormat`] if the top level is not an array.
pub fn decode_records(content: &str, format: &'static str) -> Result<Vec<Value>> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ChatmillError::parse(format, e))?;

    match value {
        Value::Array(records) => Ok(records),
        other => Err(ChatmillError::invalid_format(
            format,
            format!("expected a top-level array, found {}", json_kind(&other)),
        )),
    }
}

/// Returns a short label for a record, used in warnings.
pub(crate) fn record_label(record: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| {
            record
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("unknown")
        .to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_records_array() {
        let records = decode_records(r#"[{"a": 1}, {"b": 2}]"#, "ChatGPT JSON").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_decode_records_not_json() {
        let err = decode_records("{{", "ChatGPT JSON").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_decode_records_not_array() {
        let err = decode_records(r#"{"conversations": []}"#, "Claude JSON").unwrap_err();
        assert!(err.is_invalid_format());
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_record_label() {
        let record = json!({"uuid": "", "title": "Hello"});
        assert_eq!(record_label(&record, &["uuid", "title"]), "Hello");
        assert_eq!(record_label(&json!(42), &["title"]), "unknown");
    }
}
