//! Markdown note writer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Exporter, unique_path};
use crate::config::MarkdownConfig;
use crate::error::Result;
use crate::format::OutputFormat;
use crate::{Chat, Role};

const MAX_FILENAME_CHARS: usize = 100;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Writes one Markdown file per conversation.
///
/// # Format
/// ```text
/// ---
/// title: "Rust lifetimes"
/// date: 2024-06-15
/// source: claude
/// tags: [lifetimes, borrow checker]
/// messages: 2
/// ---
///
/// # Rust lifetimes
///
/// ## 👤 User
///
/// What is 'static?
///
/// ## 🤖 Assistant
///
/// A lifetime that lasts forever.
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownExporter {
    config: MarkdownConfig,
}

impl MarkdownExporter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarkdownConfig {
        &self.config
    }

    fn frontmatter(chat: &Chat) -> String {
        let mut lines = vec![
            "---".to_string(),
            format!("title: \"{}\"", chat.title.replace('"', "\\\"")),
        ];
        if let Some(created) = chat.created_at {
            lines.push(format!("date: {}", created.format("%Y-%m-%d")));
        }
        lines.push(format!("source: {}", chat.source));
        if !chat.tags.is_empty() {
            lines.push(format!("tags: [{}]", chat.tags.join(", ")));
        }
        lines.push(format!("messages: {}", chat.message_count()));
        lines.push("---\n".to_string());
        lines.join("\n")
    }

    fn target_dir(&self, chat: &Chat, destination: &Path) -> PathBuf {
        match chat.created_at {
            Some(created) if self.config.organize_by_date => destination
                .join(created.format("%Y").to_string())
                .join(created.format("%m").to_string()),
            _ => destination.to_path_buf(),
        }
    }
}

impl Exporter for MarkdownExporter {
    fn name(&self) -> &'static str {
        "Markdown"
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn export(&self, chats: &[Chat], destination: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(destination)?;

        let mut written = Vec::with_capacity(chats.len());
        for chat in chats {
            let dir = self.target_dir(chat, destination);
            fs::create_dir_all(&dir)?;

            let path = unique_path(&dir.join(format!("{}.md", sanitize_filename(&chat.title))));
            fs::write(&path, self.export_single(chat)?)?;
            debug!(conversation = %chat.id, path = %path.display(), "wrote markdown note");
            written.push(path);
        }
        Ok(written)
    }

    fn export_single(&self, chat: &Chat) -> Result<String> {
        let mut parts = Vec::with_capacity(chat.message_count() * 2 + 2);

        if self.config.include_frontmatter {
            parts.push(Self::frontmatter(chat));
        }
        parts.push(format!("# {}\n", chat.title));

        for message in &chat.messages {
            let mut heading = format!("## {}", role_label(message.role));
            if self.config.include_timestamps {
                if let Some(ts) = message.timestamp {
                    heading.push_str(&format!(" ({})", ts.format("%Y-%m-%d %H:%M")));
                }
            }
            parts.push(format!("{heading}\n"));
            parts.push(format!("{}\n", message.text));
        }

        Ok(parts.join("\n"))
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "👤 User",
        Role::Assistant => "🤖 Assistant",
        Role::System => "⚙️ System",
    }
}

/// Turns a title into a safe file stem.
///
/// Drops `< > : " / \ | ? *`, collapses whitespace, and cuts names longer
/// than 100 characters back to the last space. Falls back to `Untitled`.
///
/// # Example
///
/// ```rust
/// use chatmill::core::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("What is a/b?  Really"), "What is ab Really");
/// assert_eq!(sanitize_filename("???"), "Untitled");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    let mut name = WHITESPACE.replace_all(&stripped, " ").trim().to_string();

    if name.chars().count() > MAX_FILENAME_CHARS {
        let cut: String = name.chars().take(MAX_FILENAME_CHARS).collect();
        name = match cut.rsplit_once(' ') {
            Some((head, _)) => head.to_string(),
            None => cut,
        };
    }

    if name.is_empty() {
        "Untitled".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, Platform};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn chat(title: &str) -> Chat {
        Chat::new(Platform::ChatGpt, title)
            .with_message(Message::new(Role::User, "Hi"))
            .with_message(Message::new(Role::Assistant, "Hello!"))
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j"), "abcdefghij");
        assert_eq!(sanitize_filename("  many \t\n spaces  "), "many spaces");
        assert_eq!(sanitize_filename(""), "Untitled");
        assert_eq!(sanitize_filename("  ??  "), "Untitled");
    }

    #[test]
    fn test_sanitize_long_titles() {
        let words = "word ".repeat(30);
        let name = sanitize_filename(&words);
        assert!(name.chars().count() <= 100);
        assert!(name.ends_with("word"));

        let solid = "x".repeat(150);
        assert_eq!(sanitize_filename(&solid).len(), 100);
    }

    #[test]
    fn test_export_single_with_frontmatter() {
        let created = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
        let chat = chat("Say \"hi\"")
            .with_created_at(created)
            .with_tags(["greetings", "rust"]);

        let out = MarkdownExporter::default().export_single(&chat).unwrap();
        assert_eq!(
            out,
            "---\ntitle: \"Say \\\"hi\\\"\"\ndate: 2024-06-15\nsource: chatgpt\n\
             tags: [greetings, rust]\nmessages: 2\n---\n\n# Say \"hi\"\n\n\
             ## 👤 User\n\nHi\n\n## 🤖 Assistant\n\nHello!\n"
        );
    }

    #[test]
    fn test_export_single_minimal() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let chat = Chat::new(Platform::Claude, "T")
            .with_message(Message::new(Role::System, "Be brief").with_timestamp(ts));
        let exporter = MarkdownExporter::new(
            MarkdownConfig::new().with_frontmatter(false).with_timestamps(true),
        );

        let out = exporter.export_single(&chat).unwrap();
        assert_eq!(out, "# T\n\n## ⚙️ System (2024-01-02 03:04)\n\nBe brief\n");
    }

    #[test]
    fn test_export_never_overwrites() {
        let dir = tempdir().unwrap();
        let written = MarkdownExporter::default()
            .export(&[chat("Test"), chat("Test"), chat("Test")], dir.path())
            .unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["Test.md", "Test_1.md", "Test_2.md"]);
    }

    #[test]
    fn test_export_by_date() {
        let dir = tempdir().unwrap();
        let created = Utc.with_ymd_and_hms(2023, 3, 9, 0, 0, 0).unwrap();
        let exporter = MarkdownExporter::new(MarkdownConfig::new().with_organize_by_date(true));

        let written = exporter
            .export(&[chat("Dated").with_created_at(created), chat("Undated")], dir.path())
            .unwrap();

        assert_eq!(written[0], dir.path().join("2023").join("03").join("Dated.md"));
        assert_eq!(written[1], dir.path().join("Undated.md"));
        assert!(written.iter().all(|p| p.is_file()));
    }
}
