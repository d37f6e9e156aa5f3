//! Canonical conversation type.
//!
//! A [`Chat`] is created once by a loader, replaced (never mutated) by each
//! processor, and consumed by one exporter call.
//!
//! # Example
//!
//! ```
//! use chatmill::{Chat, Message, Platform, Role};
//!
//! let chat = Chat::new(Platform::Claude, "Rust lifetimes")
//!     .with_message(Message::new(Role::User, "What is 'static?"))
//!     .with_message(Message::new(Role::Assistant, "A lifetime that lasts forever."));
//!
//! assert_eq!(chat.message_count(), 2);
//! assert_eq!(chat.user_messages().count(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::loader::Platform;
use crate::message::{Message, Role, generate_id};

/// Title used when an export record has none.
pub const UNTITLED: &str = "Untitled Conversation";

/// A normalized conversation.
///
/// Field order matches the canonical JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Conversation id from the export, or a generated UUID.
    pub id: String,

    /// Platform the export came from.
    pub source: Platform,

    /// Path of the export file this chat was read from.
    #[serde(default)]
    pub source_file: String,

    /// Conversation title.
    pub title: String,

    /// When the conversation was started.
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the conversation was last changed.
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Messages in conversation order.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Keyword tags, replaced wholesale by the tagger.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Token count, when something has measured it.
    #[serde(default)]
    pub token_count: Option<u64>,
}

impl Chat {
    /// Creates an empty chat with a generated id.
    pub fn new(source: Platform, title: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            source,
            source_file: String::new(),
            title: title.into(),
            created_at: None,
            updated_at: None,
            messages: Vec::new(),
            tags: Vec::new(),
            token_count: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = Some(ts);
        self
    }

    #[must_use]
    pub fn with_updated_at(mut self, ts: DateTime<Utc>) -> Self {
        self.updated_at = Some(ts);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the chat has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates over the user's messages.
    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::User)
    }

    /// Iterates over the assistant's messages.
    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::Assistant)
    }

    /// Concatenates all non-empty message texts, separated by a blank line.
    pub fn to_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| !m.text.is_empty())
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total characters across all message texts.
    pub fn char_count(&self) -> usize {
        self.messages.iter().map(|m| m.text.chars().count()).sum()
    }
}
