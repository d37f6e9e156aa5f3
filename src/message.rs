//! Canonical message type shared by every loader, processor and exporter.
//!
//! # Examples
//!
//! ```
//! use chatmill::{Message, Role};
//! use chrono::Utc;
//!
//! let msg = Message::new(Role::User, "How do I parse JSON in Rust?")
//!     .with_id("msg-1")
//!     .with_timestamp(Utc::now());
//!
//! assert_eq!(msg.role, Role::User);
//! assert_eq!(msg.id, "msg-1");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation
    User,
    /// The model's replies
    Assistant,
    /// System prompts and platform-injected context
    System,
}

impl Role {
    /// Returns the lowercase name used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    /// Maps an export role string to a role, rejecting anything unknown.
    ///
    /// ```
    /// use chatmill::Role;
    ///
    /// assert_eq!(Role::from_name("assistant"), Some(Role::Assistant));
    /// assert_eq!(Role::from_name("tool"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized message.
///
/// `text` is never empty for a message that survives loading or processing;
/// every stage that could empty it drops the message instead.
///
/// Serializes with every field present; absent optionals become `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier from the export, or a generated UUID when the export has none.
    pub id: String,

    /// Who wrote the message.
    pub role: Role,

    /// Message body.
    pub text: String,

    /// When the message was written, if the export says.
    #[serde(default, with = "crate::timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Extra platform data, such as the model that produced a reply.
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl Message {
    /// Creates a message with a freshly generated id and no metadata.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            role,
            text: text.into(),
            timestamp: None,
            metadata: None,
        }
    }

    /// Builder method to set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Builder method to set one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Returns a copy with the text replaced, keeping id, role, timestamp and metadata.
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Returns `true` if the text is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Returns `id` if it is non-empty, otherwise a fresh UUID v4.
pub(crate) fn id_or_generate(id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_id(),
    }
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
