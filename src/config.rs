//! Configuration types for processors and exporters.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. Every struct has sensible
//! defaults, `with_*` builders, and serde support so it can be stored in a
//! settings file.
//!
//! # Processor Configurations
//!
//! - [`CleanerConfig`] - HTML, whitespace and boilerplate cleanup
//! - [`PrivacyConfig`] - PII categories and replacement template
//! - [`TaggerConfig`] - Keyword tag extraction
//!
//! # Exporter Configurations
//!
//! - [`MarkdownConfig`] - One note per conversation
//! - [`JsonConfig`] - Canonical JSON
//! - [`ChunkedConfig`] - Token-budgeted chunks
//! - [`ExportConfig`] - Bundle of the three, used by [`create_exporter`](crate::format::create_exporter)
//!
//! # Example
//!
//! ```rust
//! use chatmill::config::{CleanerConfig, TaggerConfig};
//!
//! let cleaner = CleanerConfig::new().with_remove_system_messages(true);
//! let tagger = TaggerConfig::new().with_max_tags(3).with_use_assistant_messages(true);
//! assert!(cleaner.remove_html);
//! assert_eq!(tagger.max_tags, 3);
//! ```

use serde::{Deserialize, Serialize};

// =========================================================================
// Processors
// =========================================================================

/// Configuration for the text cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Drop lines that are stock AI disclaimers (default: true)
    pub remove_boilerplate: bool,

    /// Strip HTML tags (default: true)
    pub remove_html: bool,

    /// Drop every system message (default: false)
    pub remove_system_messages: bool,

    /// Collapse tabs, repeated spaces and runs of blank lines (default: true)
    pub normalize_whitespace: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            remove_boilerplate: true,
            remove_html: true,
            remove_system_messages: false,
            normalize_whitespace: true,
        }
    }
}

impl CleanerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_remove_boilerplate(mut self, enabled: bool) -> Self {
        self.remove_boilerplate = enabled;
        self
    }

    #[must_use]
    pub fn with_remove_html(mut self, enabled: bool) -> Self {
        self.remove_html = enabled;
        self
    }

    #[must_use]
    pub fn with_remove_system_messages(mut self, enabled: bool) -> Self {
        self.remove_system_messages = enabled;
        self
    }

    #[must_use]
    pub fn with_normalize_whitespace(mut self, enabled: bool) -> Self {
        self.normalize_whitespace = enabled;
        self
    }
}

/// Configuration for PII redaction.
///
/// Category names are validated when the redactor is built, not here.
///
/// # Example
///
/// ```rust
/// use chatmill::config::PrivacyConfig;
///
/// let config = PrivacyConfig::new()
///     .with_categories(["email", "phone"])
///     .with_replacement("<{type}>");
/// assert_eq!(config.categories.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    /// Category names to redact (default: all seven)
    pub categories: Vec<String>,

    /// Replacement template; `{type}` becomes the upper-case category name
    /// (default: `[REDACTED_{type}]`)
    pub replacement: String,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            categories: crate::core::privacy::PiiCategory::all()
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            replacement: "[REDACTED_{type}]".to_string(),
        }
    }
}

impl PrivacyConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selected categories.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the replacement template.
    #[must_use]
    pub fn with_replacement(mut self, template: impl Into<String>) -> Self {
        self.replacement = template.into();
        self
    }
}

/// Configuration for keyword tagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Maximum number of tags per conversation (default: 5)
    pub max_tags: usize,

    /// Shortest keyword kept, in characters (default: 3)
    pub min_keyword_length: usize,

    /// Include the title in the corpus (default: true)
    pub use_title: bool,

    /// Include user messages in the corpus (default: true)
    pub use_user_messages: bool,

    /// Include assistant messages in the corpus (default: false)
    pub use_assistant_messages: bool,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            max_tags: 5,
            min_keyword_length: 3,
            use_title: true,
            use_user_messages: true,
            use_assistant_messages: false,
        }
    }
}

impl TaggerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }

    #[must_use]
    pub fn with_min_keyword_length(mut self, length: usize) -> Self {
        self.min_keyword_length = length;
        self
    }

    #[must_use]
    pub fn with_use_title(mut self, enabled: bool) -> Self {
        self.use_title = enabled;
        self
    }

    #[must_use]
    pub fn with_use_user_messages(mut self, enabled: bool) -> Self {
        self.use_user_messages = enabled;
        self
    }

    #[must_use]
    pub fn with_use_assistant_messages(mut self, enabled: bool) -> Self {
        self.use_assistant_messages = enabled;
        self
    }
}

// =========================================================================
// Exporters
// =========================================================================

/// Configuration for Markdown notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Write a YAML-like frontmatter block (default: true)
    pub include_frontmatter: bool,

    /// Put notes under `YYYY/MM/` when the creation date is known (default: false)
    pub organize_by_date: bool,

    /// Add the time to each message heading (default: false)
    pub include_timestamps: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            include_frontmatter: true,
            organize_by_date: false,
            include_timestamps: false,
        }
    }
}

impl MarkdownConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_frontmatter(mut self, enabled: bool) -> Self {
        self.include_frontmatter = enabled;
        self
    }

    #[must_use]
    pub fn with_organize_by_date(mut self, enabled: bool) -> Self {
        self.organize_by_date = enabled;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.include_timestamps = enabled;
        self
    }
}

/// Configuration for canonical JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Indent the output (default: true)
    pub pretty: bool,

    /// Write one array file instead of one file per conversation (default: true)
    pub single_file: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            single_file: true,
        }
    }
}

impl JsonConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    #[must_use]
    pub fn with_single_file(mut self, enabled: bool) -> Self {
        self.single_file = enabled;
        self
    }
}

/// Configuration for token-chunked output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkedConfig {
    /// Token budget per chunk (default: 4096). The character budget is four
    /// times this.
    pub chunk_size: usize,

    /// Include source, title, date and tags in the conversation summaries
    /// (default: true)
    pub include_metadata: bool,
}

impl Default for ChunkedConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            include_metadata: true,
        }
    }
}

impl ChunkedConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chunk_size(mut self, tokens: usize) -> Self {
        self.chunk_size = tokens;
        self
    }

    #[must_use]
    pub fn with_include_metadata(mut self, enabled: bool) -> Self {
        self.include_metadata = enabled;
        self
    }
}

/// Settings for every exporter, so one value can drive any output format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub markdown: MarkdownConfig,
    pub json: JsonConfig,
    pub chunked: ChunkedConfig,
}

impl ExportConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_markdown(mut self, config: MarkdownConfig) -> Self {
        self.markdown = config;
        self
    }

    #[must_use]
    pub fn with_json(mut self, config: JsonConfig) -> Self {
        self.json = config;
        self
    }

    #[must_use]
    pub fn with_chunked(mut self, config: ChunkedConfig) -> Self {
        self.chunked = config;
        self
    }
}
