//! Canonical JSON writer and reader.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::{Exporter, create_parent_dir, force_json_extension, sanitize_filename, unique_path};
use crate::Chat;
use crate::config::JsonConfig;
use crate::error::{ChatmillError, Result};
use crate::format::OutputFormat;

/// Writes chats in the canonical JSON layout.
///
/// With `single_file` the destination is a file holding an array of every
/// chat; otherwise it is a directory with one `<id>.json` per chat. Ids are
/// made filename-safe, and a repeated id gets a `_N` suffix.
///
/// # Format
/// ```json
/// [
///   {
///     "id": "conv-1",
///     "source": "chatgpt",
///     "source_file": "conversations.json",
///     "title": "Hello",
///     "created_at": "2024-06-15T12:30:00.000000Z",
///     "updated_at": null,
///     "messages": [
///       {"id": "m1", "role": "user", "text": "Hi", "timestamp": null, "metadata": null}
///     ],
///     "tags": [],
///     "token_count": null
///   }
/// ]
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    config: JsonConfig,
}

impl JsonExporter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JsonConfig {
        &self.config
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn export(&self, chats: &[Chat], destination: &Path) -> Result<Vec<PathBuf>> {
        if self.config.single_file {
            let path = force_json_extension(destination);
            create_parent_dir(&path)?;
            fs::write(&path, self.render(chats)?)?;
            debug!(conversations = chats.len(), path = %path.display(), "wrote json array");
            return Ok(vec![path]);
        }

        fs::create_dir_all(destination)?;
        chats
            .iter()
            .map(|chat| {
                let path =
                    unique_path(&destination.join(format!("{}.json", sanitize_filename(&chat.id))));
                fs::write(&path, self.export_single(chat)?)?;
                Ok(path)
            })
            .collect()
    }

    fn export_single(&self, chat: &Chat) -> Result<String> {
        self.render(chat)
    }
}

/// Decodes a single-file canonical JSON export.
///
/// # Errors
///
/// Returns [`ChatmillError::Parse`] if the text is not a JSON array of chats.
pub fn from_json(content: &str) -> Result<Vec<Chat>> {
    serde_json::from_str(content).map_err(|e| ChatmillError::parse("canonical JSON", e))
}

/// Reads a single-file canonical JSON export from disk.
pub fn read_json(path: &Path) -> Result<Vec<Chat>> {
    let content = fs::read_to_string(path)?;
    from_json(&content).map_err(|e| e.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, Platform, Role};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn chat(id: &str) -> Chat {
        Chat::new(Platform::ChatGpt, "Hello")
            .with_id(id)
            .with_source_file("conversations.json")
            .with_created_at(Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap())
            .with_message(
                Message::new(Role::User, "Hi")
                    .with_id("m1")
                    .with_metadata("model", "gpt-4o"),
            )
    }

    #[test]
    fn test_export_single_layout() {
        let exporter = JsonExporter::new(JsonConfig::new().with_pretty(false));
        let json = exporter.export_single(&chat("c1")).unwrap();
        assert_eq!(
            json,
            r#"{"id":"c1","source":"chatgpt","source_file":"conversations.json","title":"Hello","created_at":"2024-06-15T12:30:00.000000Z","updated_at":null,"messages":[{"id":"m1","role":"user","text":"Hi","timestamp":null,"metadata":{"model":"gpt-4o"}}],"tags":[],"token_count":null}"#
        );
    }

    #[test]
    fn test_single_file_forces_extension() {
        let dir = tempdir().unwrap();
        let written = JsonExporter::default()
            .export(&[chat("c1"), chat("c2")], &dir.path().join("nested").join("all"))
            .unwrap();

        assert_eq!(written, [dir.path().join("nested").join("all.json")]);
        let back = read_json(&written[0]).unwrap();
        assert_eq!(back, [chat("c1"), chat("c2")]);
    }

    #[test]
    fn test_split_writes_one_file_per_chat() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(JsonConfig::new().with_single_file(false));
        let written = exporter.export(&[chat("c1"), chat("c2")], dir.path()).unwrap();

        assert_eq!(written, [dir.path().join("c1.json"), dir.path().join("c2.json")]);
        let content = std::fs::read_to_string(&written[1]).unwrap();
        assert!(content.contains("\"id\": \"c2\""));
    }

    #[test]
    fn test_split_names_stay_inside_destination() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("split");
        let exporter = JsonExporter::new(JsonConfig::new().with_single_file(false));
        let written = exporter
            .export(&[chat("a/b"), chat("../x"), chat("c1"), chat("c1")], &out)
            .unwrap();

        assert_eq!(
            written,
            [
                out.join("ab.json"),
                out.join("..x.json"),
                out.join("c1.json"),
                out.join("c1_1.json"),
            ]
        );
        assert!(written.iter().all(|path| path.parent() == Some(out.as_path())));
        assert!(!dir.path().join("x.json").exists());

        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("\"id\": \"a/b\""));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = from_json("{not json").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_read_json_attaches_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
