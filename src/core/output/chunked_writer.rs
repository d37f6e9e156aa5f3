//! Token-budgeted chunk writer for retrieval pipelines.
//!
//! Messages are packed greedily into chunks of at most
//! `chunk_size * CHARS_PER_TOKEN` characters. A message is never split; one
//! that is larger than the budget gets a chunk to itself.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::{Exporter, create_parent_dir, force_json_extension};
use crate::config::ChunkedConfig;
use crate::error::Result;
use crate::format::OutputFormat;
use crate::loader::Platform;
use crate::timestamp::format_datetime;
use crate::{Chat, Message};

/// Characters counted as one token when estimating.
pub const CHARS_PER_TOKEN: usize = 4;

const DOCUMENT_FORMAT: &str = "chatmill-chunks-v1";
const GENERATOR: &str = "chatmill";

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "_meta")]
    meta: Meta,
    conversations: Vec<Summary<'a>>,
    chunks: Vec<Chunk>,
}

#[derive(Serialize)]
struct Meta {
    format: &'static str,
    generator: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<String>,
    chunk_size: usize,
}

#[derive(Serialize)]
struct Summary<'a> {
    id: &'a str,
    #[serde(flatten)]
    details: Option<SummaryDetails<'a>>,
    message_count: usize,
    estimated_tokens: usize,
}

#[derive(Serialize)]
struct SummaryDetails<'a> {
    source: Platform,
    title: &'a str,
    #[serde(with = "crate::timestamp::option")]
    created_at: Option<DateTime<Utc>>,
    tags: &'a [String],
}

/// One chunk of consecutive messages from a single conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub conversation_id: String,
    /// Rendered messages joined by a blank line
    pub text: String,
    pub message_ids: Vec<String>,
    pub tags: Vec<String>,
    pub token_estimate: usize,
}

/// Writes every chat into one compact JSON document of chunks.
///
/// # Format
/// ```json
/// {
///   "_meta": {"format": "chatmill-chunks-v1", "generator": "chatmill", "generated_at": "...", "chunk_size": 4096},
///   "conversations": [{"id": "c1", "source": "claude", "title": "T", "created_at": null, "tags": [], "message_count": 2, "estimated_tokens": 3}],
///   "chunks": [{"chunk_id": "chunk_0", "conversation_id": "c1", "text": "[USER]: Hi\n\n[ASSISTANT]: Hello", "message_ids": ["m1", "m2"], "tags": [], "token_estimate": 7}]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChunkedExporter {
    config: ChunkedConfig,
}

impl ChunkedExporter {
    pub fn new(config: ChunkedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkedConfig {
        &self.config
    }

    /// Character budget per chunk.
    pub fn max_chars(&self) -> usize {
        self.config.chunk_size.saturating_mul(CHARS_PER_TOKEN)
    }

    /// Splits one chat into chunks, numbering them from `next_id`.
    pub fn chunk_chat(&self, chat: &Chat, next_id: &mut usize) -> Vec<Chunk> {
        let rendered: Vec<String> = chat.messages.iter().map(render_message).collect();
        let lengths: Vec<usize> = rendered.iter().map(|r| r.chars().count()).collect();

        pack(&lengths, self.max_chars())
            .into_iter()
            .map(|range| {
                let text = rendered[range.clone()].join("\n\n");
                let chunk = Chunk {
                    chunk_id: format!("chunk_{next_id}"),
                    conversation_id: chat.id.clone(),
                    token_estimate: text.chars().count() / CHARS_PER_TOKEN,
                    text,
                    message_ids: chat.messages[range].iter().map(|m| m.id.clone()).collect(),
                    tags: chat.tags.clone(),
                };
                *next_id += 1;
                chunk
            })
            .collect()
    }

    fn summary<'a>(&self, chat: &'a Chat) -> Summary<'a> {
        let chars: usize = chat.messages.iter().map(|m| m.text.chars().count()).sum();
        Summary {
            id: &chat.id,
            details: self.config.include_metadata.then(|| SummaryDetails {
                source: chat.source,
                title: &chat.title,
                created_at: chat.created_at,
                tags: &chat.tags,
            }),
            message_count: chat.message_count(),
            estimated_tokens: chars / CHARS_PER_TOKEN,
        }
    }

    fn document<'a>(&self, chats: &'a [Chat], generated_at: Option<String>) -> Document<'a> {
        let mut next_id = 0;
        let chunks = chats
            .iter()
            .flat_map(|chat| self.chunk_chat(chat, &mut next_id))
            .collect();

        Document {
            meta: Meta {
                format: DOCUMENT_FORMAT,
                generator: GENERATOR,
                generated_at,
                chunk_size: self.config.chunk_size,
            },
            conversations: chats.iter().map(|chat| self.summary(chat)).collect(),
            chunks,
        }
    }
}

impl Exporter for ChunkedExporter {
    fn name(&self) -> &'static str {
        "Chunked JSON"
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Chunked
    }

    fn export(&self, chats: &[Chat], destination: &Path) -> Result<Vec<PathBuf>> {
        let path = force_json_extension(destination);
        create_parent_dir(&path)?;

        let document = self.document(chats, Some(format_datetime(&Utc::now())));
        debug!(chunks = document.chunks.len(), path = %path.display(), "writing chunk document");
        fs::write(&path, serde_json::to_string(&document)?)?;
        Ok(vec![path])
    }

    fn export_single(&self, chat: &Chat) -> Result<String> {
        let document = self.document(std::slice::from_ref(chat), None);
        Ok(serde_json::to_string(&document)?)
    }
}

fn render_message(message: &Message) -> String {
    format!("[{}]: {}", message.role.as_str().to_uppercase(), message.text)
}

/// Groups items greedily so each group's total length stays within
/// `max_chars`, except single items that alone exceed it.
fn pack(lengths: &[usize], max_chars: usize) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut current = 0;

    for (index, &len) in lengths.iter().enumerate() {
        if current + len > max_chars && index > start {
            groups.push(start..index);
            start = index;
            current = 0;
        }
        current += len;
    }
    if start < lengths.len() {
        groups.push(start..lengths.len());
    }

    groups
}
