//! Shared ChatGPT parsing utilities.
//!
//! ChatGPT stores each conversation as a `mapping` of node id to node, where
//! every node names its parent and children. Edits and regenerations create
//! branches; only the primary thread (always the first child) is kept.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::RecordError;
use crate::chat::UNTITLED;
use crate::loader::Platform;
use crate::message::id_or_generate;
use crate::timestamp::from_epoch_value;
use crate::{Chat, Message, Role};

/// Content types whose parts carry conversation text.
const TEXT_CONTENT_TYPES: &[&str] = &["text", "user_editable_context"];

/// Raw ChatGPT conversation record.
#[derive(Debug, Deserialize)]
pub struct ChatGptRawConversation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Epoch seconds, usually fractional
    #[serde(default)]
    pub create_time: Option<Value>,
    #[serde(default)]
    pub update_time: Option<Value>,
    /// Node id to node, in file order
    #[serde(default)]
    pub mapping: Option<Map<String, Value>>,
}

/// One node of the conversation tree.
#[derive(Debug, Default, Deserialize)]
pub struct ChatGptRawNode {
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<String>>,
    /// Kept undecoded; a payload that does not decode is skipped on its own.
    #[serde(default)]
    pub message: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatGptRawMessage {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    author: Option<ChatGptRawAuthor>,
    #[serde(default)]
    content: Option<ChatGptRawContent>,
    #[serde(default)]
    create_time: Option<Value>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ChatGptRawAuthor {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatGptRawContent {
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    parts: Option<Vec<Value>>,
}

/// Joins the text-bearing parts of a message.
///
/// String parts are taken verbatim; object parts contribute their `text`
/// field when it is a non-empty string. Parts are joined with `\n` and the
/// result is trimmed.
///
/// ```
/// use chatmill::parsing::chatgpt::extract_chatgpt_text;
/// use serde_json::json;
///
/// let parts = vec![json!("Hello"), json!({"text": "world"}), json!({"image": 1})];
/// assert_eq!(extract_chatgpt_text(&parts), "Hello\nworld");
/// ```
pub fn extract_chatgpt_text(parts: &[Value]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj
                .get("text")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Walks the primary thread of a conversation tree.
///
/// The root is the first node, in file order, without a parent. From there
/// the walk follows only `children[0]` and stops when a child id is missing
/// from the arena. A revisited node ends the walk with a warning; the nodes
/// collected so far are kept.
///
/// Returns `None` when there is no root.
pub fn primary_thread(nodes: &[(String, ChatGptRawNode)]) -> Option<Vec<&ChatGptRawNode>> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (id.as_str(), i))
        .collect();

    let mut current = nodes.iter().position(|(_, node)| node.parent.is_none())?;
    let mut visited = HashSet::new();
    let mut thread = Vec::new();

    loop {
        if !visited.insert(current) {
            warn!(node = %nodes[current].0, "cycle in conversation tree, stopping traversal");
            break;
        }

        let node = &nodes[current].1;
        thread.push(node);

        let next = node
            .children
            .as_deref()
            .and_then(<[String]>::first)
            .and_then(|child| index.get(child.as_str()));

        match next {
            Some(&next) => current = next,
            None => break,
        }
    }

    Some(thread)
}

/// Converts a decoded message payload, applying the acceptance rules.
///
/// Returns `None` for unknown roles, non-text content, empty text and
/// visually hidden messages.
fn parse_chatgpt_message(raw: ChatGptRawMessage) -> Option<Message> {
    let role = raw
        .author
        .and_then(|author| author.role)
        .as_deref()
        .and_then(Role::from_name)?;

    let content = raw.content?;
    let content_type = content.content_type.unwrap_or_default();
    if !TEXT_CONTENT_TYPES.contains(&content_type.as_str()) {
        return None;
    }

    let text = extract_chatgpt_text(content.parts.as_deref().unwrap_or_default());
    if text.is_empty() {
        return None;
    }

    let metadata = raw.metadata.unwrap_or_default();
    if metadata
        .get("is_visually_hidden_from_conversation")
        .is_some_and(is_truthy)
    {
        return None;
    }

    let mut message = Message::new(role, text).with_id(id_or_generate(raw.id.as_deref()));

    if let Some(ts) = raw
        .create_time
        .as_ref()
        .filter(|v| is_truthy(v))
        .and_then(from_epoch_value)
    {
        message = message.with_timestamp(ts);
    }

    if let Some(model) = metadata.get("model_slug").filter(|v| is_truthy(v)) {
        message = message.with_metadata("model", model.clone());
    }

    Some(message)
}

/// Converts one raw ChatGPT record into a chat.
///
/// Returns `Ok(None)` when the tree has no root or the primary thread holds no
/// accepted message.
///
/// # Errors
///
/// Returns [`RecordError`] if the record or one of its nodes has the wrong shape.
pub fn parse_chatgpt_conversation(
    record: Value,
    source_file: &str,
) -> Result<Option<Chat>, RecordError> {
    let raw: ChatGptRawConversation = serde_json::from_value(record)?;

    let nodes = raw
        .mapping
        .unwrap_or_default()
        .into_iter()
        .map(|(id, node)| Ok((id, serde_json::from_value::<ChatGptRawNode>(node)?)))
        .collect::<Result<Vec<_>, RecordError>>()?;

    let Some(thread) = primary_thread(&nodes) else {
        return Ok(None);
    };

    let messages: Vec<Message> = thread
        .into_iter()
        .filter_map(|node| node.message.as_ref())
        .filter(|payload| is_truthy(payload))
        .filter_map(|payload| serde_json::from_value::<ChatGptRawMessage>(payload.clone()).ok())
        .filter_map(parse_chatgpt_message)
        .collect();

    if messages.is_empty() {
        return Ok(None);
    }

    let id = [raw.id.as_deref(), raw.conversation_id.as_deref()]
        .into_iter()
        .flatten()
        .find(|id| !id.is_empty());

    let title = raw
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let mut chat = Chat::new(Platform::ChatGpt, title)
        .with_id(id_or_generate(id))
        .with_source_file(source_file)
        .with_messages(messages);

    if let Some(ts) = epoch_field(raw.create_time.as_ref()) {
        chat = chat.with_created_at(ts);
    }
    if let Some(ts) = epoch_field(raw.update_time.as_ref()) {
        chat = chat.with_updated_at(ts);
    }

    Ok(Some(chat))
}

fn epoch_field(value: Option<&Value>) -> Option<chrono::DateTime<chrono::Utc>> {
    value.filter(|v| is_truthy(v)).and_then(from_epoch_value)
}

/// Export truthiness: `null`, `false`, zero and empty values are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
