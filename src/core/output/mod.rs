//! Exporters that write chats to disk.
//!
//! - [`MarkdownExporter`] - One Markdown note per conversation
//! - [`JsonExporter`] - Canonical JSON, one array file or one file per chat
//! - [`ChunkedExporter`] - Token-budgeted chunks for retrieval pipelines
//!
//! # Choosing a Format
//!
//! | Format | Use Case | Layout |
//! |--------|----------|--------|
//! | Markdown | Note apps, reading | Directory of `.md` files |
//! | JSON | Archival, round trips | One `.json` array (or a directory) |
//! | Chunked | Embeddings, RAG | One compact `.json` document |
//!
//! # Example
//!
//! ```rust,no_run
//! use chatmill::config::JsonConfig;
//! use chatmill::core::output::{Exporter, JsonExporter};
//! use chatmill::{Chat, Message, Platform, Role};
//!
//! # fn main() -> chatmill::Result<()> {
//! let chat = Chat::new(Platform::Claude, "Notes")
//!     .with_message(Message::new(Role::User, "Hello"));
//!
//! let written = JsonExporter::new(JsonConfig::default()).export(&[chat], "out/all.json".as_ref())?;
//! assert_eq!(written.len(), 1);
//! # Ok(())
//! # }
//! ```

mod chunked_writer;
mod json_writer;
mod markdown_writer;

pub use chunked_writer::{CHARS_PER_TOKEN, ChunkedExporter};
pub use json_writer::{JsonExporter, from_json, read_json};
pub use markdown_writer::{MarkdownExporter, sanitize_filename};

use std::path::{Path, PathBuf};

use crate::Chat;
use crate::error::Result;
use crate::format::OutputFormat;

/// Writes processed chats in one output format.
///
/// Exporters never receive empty chats; the pipeline filters them first.
pub trait Exporter: Send + Sync {
    /// Returns the human-readable name of this exporter.
    fn name(&self) -> &'static str;

    /// Returns the format this exporter writes.
    fn format(&self) -> OutputFormat;

    /// Writes `chats` to `destination` and returns every path written.
    ///
    /// Whether `destination` is a file or a directory depends on the format.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmillError::Io`](crate::ChatmillError::Io) if a directory
    /// or file cannot be written.
    fn export(&self, chats: &[Chat], destination: &Path) -> Result<Vec<PathBuf>>;

    /// Renders one chat to a string without touching the filesystem.
    fn export_single(&self, chat: &Chat) -> Result<String>;
}

/// Returns `path` with a `.json` extension unless it already has one.
pub(crate) fn force_json_extension(path: &Path) -> PathBuf {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        path.to_path_buf()
    } else {
        path.with_extension("json")
    }
}

/// Returns `path`, or the first free `stem_N.ext` next to it.
pub(crate) fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| path.with_file_name(format!("{stem}_{n}{suffix}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Creates the parent directory of a file path if it has one.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_json_extension() {
        assert_eq!(force_json_extension(Path::new("out/all")), Path::new("out/all.json"));
        assert_eq!(force_json_extension(Path::new("out/all.txt")), Path::new("out/all.json"));
        assert_eq!(force_json_extension(Path::new("out/all.JSON")), Path::new("out/all.JSON"));
    }
}
