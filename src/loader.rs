//! Unified loader trait for conversation exports.
//!
//! A loader reads one export file and yields canonical [`Chat`]s lazily. The
//! file is decoded structurally up front; each record is converted only when
//! the stream is pulled.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatmill::Result<()> {
//! use chatmill::loader::{Platform, create_loader};
//! use std::path::Path;
//!
//! let loader = create_loader(Platform::ChatGpt);
//! for chat in loader.load(Path::new("conversations.json"))? {
//!     println!("{}: {} messages", chat.title, chat.message_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Platform Selection
//!
//! Use [`Platform`] to pick a loader from a user-supplied tag:
//!
//! ```rust
//! use chatmill::loader::{Platform, create_loader};
//! use std::str::FromStr;
//!
//! let platform = Platform::from_str("anthropic").unwrap();
//! let loader = create_loader(platform);
//! assert_eq!(loader.name(), "Claude");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Chat;
use crate::error::{ChatmillError, Result};

/// A lazy, finite, non-restartable sequence of chats.
pub type ChatStream = Box<dyn Iterator<Item = Chat> + Send>;

/// Supported source platforms.
///
/// # Example
///
/// ```rust
/// use chatmill::loader::Platform;
/// use std::str::FromStr;
///
/// let platform = Platform::from_str("chatgpt").unwrap();
/// assert_eq!(platform, Platform::ChatGpt);
///
/// // Aliases are supported
/// let platform = Platform::from_str("openai").unwrap();
/// assert_eq!(platform, Platform::ChatGpt);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// ChatGPT `conversations.json` exports (branching message tree)
    #[serde(alias = "openai", alias = "gpt")]
    ChatGpt,

    /// Claude `conversations.json` exports (flat message list)
    #[serde(alias = "anthropic")]
    Claude,
}

impl Platform {
    /// Returns the lowercase tag used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::ChatGpt => "chatgpt",
            Platform::Claude => "claude",
        }
    }

    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["chatgpt", "openai", "gpt", "claude", "anthropic"]
    }

    /// Returns all available platforms.
    pub fn all() -> &'static [Platform] {
        &[Platform::ChatGpt, Platform::Claude]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = ChatmillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chatgpt" | "openai" | "gpt" => Ok(Platform::ChatGpt),
            "claude" | "anthropic" => Ok(Platform::Claude),
            _ => Err(ChatmillError::UnsupportedPlatform(s.to_string())),
        }
    }
}

/// Unified trait for loading conversation exports.
///
/// Loaders must implement:
/// - [`name`](Loader::name) - Loader identifier
/// - [`platform`](Loader::platform) - Platform this loader handles
/// - [`load_str`](Loader::load_str) - Decode content already in memory
/// - [`count_str`](Loader::count_str) - Count raw records in memory
///
/// File-based methods have default implementations on top of those.
///
/// # Errors
///
/// Only whole-file faults are errors. A single malformed record is logged
/// with `tracing::warn!` and skipped; a record that yields no messages is
/// skipped silently.
pub trait Loader: Send + Sync {
    /// Returns the human-readable name of this loader.
    fn name(&self) -> &'static str;

    /// Returns the platform this loader handles.
    fn platform(&self) -> Platform;

    /// Decodes export content and returns a lazy stream of chats.
    ///
    /// `source_file` is recorded on every produced chat.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmillError::Parse`] if the content is not JSON, or
    /// [`ChatmillError::InvalidFormat`] if its top level is not an array.
    fn load_str(&self, content: &str, source_file: &str) -> Result<ChatStream>;

    /// Returns the number of raw records in the content, before any filtering.
    fn count_str(&self, content: &str) -> Result<usize>;

    /// Reads an export file and returns a lazy stream of chats.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmillError::Io`] if the file cannot be read, plus the
    /// errors of [`load_str`](Loader::load_str) with the path attached.
    fn load(&self, path: &Path) -> Result<ChatStream> {
        let content = fs::read_to_string(path)?;
        self.load_str(&content, &path.display().to_string())
            .map_err(|e| e.with_path(path))
    }

    /// Returns the number of raw records in an export file.
    fn count(&self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path)?;
        self.count_str(&content).map_err(|e| e.with_path(path))
    }

    /// Returns `true` if the path is an existing `.json` file. Never decodes.
    fn validate(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

/// Creates a loader for the specified platform.
///
/// # Example
///
/// ```rust
/// use chatmill::loader::{Platform, create_loader};
///
/// let loader = create_loader(Platform::ChatGpt);
/// assert_eq!(loader.name(), "ChatGPT");
/// assert_eq!(loader.platform(), Platform::ChatGpt);
/// ```
pub fn create_loader(platform: Platform) -> Box<dyn Loader> {
    match platform {
        Platform::ChatGpt => Box::new(crate::loaders::ChatGptLoader::new()),
        Platform::Claude => Box::new(crate::loaders::ClaudeLoader::new()),
    }
}
