//! Conversation export loaders for each platform.
//!
//! # Available Loaders
//!
//! - [`ChatGptLoader`] - ChatGPT `conversations.json` (branching tree)
//! - [`ClaudeLoader`] - Claude `conversations.json` (flat list)
//!
//! Use [`create_loader`](crate::loader::create_loader) to pick one by [`Platform`](crate::loader::Platform).

mod chatgpt;
mod claude;

pub use chatgpt::ChatGptLoader;
pub use claude::ClaudeLoader;

use serde_json::Value;
use tracing::{debug, warn};

use crate::Chat;
use crate::loader::ChatStream;
use crate::parsing::{RecordError, record_label};

/// Turns decoded records into a lazy chat stream.
///
/// Malformed records are logged and skipped; records without messages are
/// skipped with a debug log.
pub(crate) fn stream_records<F>(
    records: Vec<Value>,
    source_file: &str,
    format: &'static str,
    label_keys: &'static [&'static str],
    convert: F,
) -> ChatStream
where
    F: Fn(Value, &str) -> Result<Option<Chat>, RecordError> + Send + 'static,
{
    let source_file = source_file.to_string();

    Box::new(
        records
            .into_iter()
            .enumerate()
            .filter_map(move |(index, record)| {
                let label = record_label(&record, label_keys);
                match convert(record, &source_file) {
                    Ok(Some(chat)) => Some(chat),
                    Ok(None) => {
                        debug!(format, index, conversation = %label, "skipping conversation without messages");
                        None
                    }
                    Err(err) => {
                        warn!(format, index, conversation = %label, error = %err, "skipping malformed conversation");
                        None
                    }
                }
            }),
    )
}
