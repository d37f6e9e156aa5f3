//! Output format registry.
//!
//! Maps format tags to exporters without any CLI dependencies.
//!
//! # Example
//!
//! ```rust
//! use chatmill::format::{ExportConfig, OutputFormat, create_exporter};
//!
//! let format: OutputFormat = "md".parse().unwrap();
//! let exporter = create_exporter(format, &ExportConfig::default());
//! assert_eq!(exporter.format(), OutputFormat::Markdown);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::output::{ChunkedExporter, Exporter, JsonExporter, MarkdownExporter};
use crate::error::ChatmillError;

pub use crate::config::ExportConfig;

/// Output format for processed conversations.
///
/// - [`Markdown`](OutputFormat::Markdown) - One note per conversation, for reading
/// - [`Json`](OutputFormat::Json) - Canonical JSON, for archival and round trips
/// - [`Chunked`](OutputFormat::Chunked) - Token-budgeted chunks, for embeddings
///
/// # Example
///
/// ```rust
/// use chatmill::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("chunks").unwrap();
/// assert_eq!(format, OutputFormat::Chunked);
/// assert_eq!(format.extension(), "json");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Markdown notes with optional frontmatter (default)
    #[default]
    #[serde(alias = "md")]
    Markdown,

    /// Canonical JSON
    Json,

    /// Chunked JSON for retrieval pipelines
    #[serde(alias = "chunks")]
    Chunked,
}

impl OutputFormat {
    /// Returns the file extension this format writes (without dot).
    ///
    /// ```rust
    /// use chatmill::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Markdown.extension(), "md");
    /// assert_eq!(OutputFormat::Json.extension(), "json");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json | OutputFormat::Chunked => "json",
        }
    }

    /// Returns the lowercase tag of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Chunked => "chunked",
        }
    }

    /// Returns `true` if this format writes into a directory rather than one file.
    ///
    /// For JSON that depends on [`JsonConfig::single_file`](crate::config::JsonConfig::single_file).
    pub fn writes_directory(&self, config: &ExportConfig) -> bool {
        match self {
            OutputFormat::Markdown => true,
            OutputFormat::Json => !config.json.single_file,
            OutputFormat::Chunked => false,
        }
    }

    /// Returns all supported format names, aliases included.
    pub fn all_names() -> &'static [&'static str] {
        &["markdown", "md", "json", "chunked", "chunks"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Markdown, OutputFormat::Json, OutputFormat::Chunked]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "Markdown"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Chunked => write!(f, "Chunked JSON"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ChatmillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "chunked" | "chunks" => Ok(OutputFormat::Chunked),
            _ => Err(ChatmillError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Creates the exporter for a format, configured from `config`.
pub fn create_exporter(format: OutputFormat, config: &ExportConfig) -> Box<dyn Exporter> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownExporter::new(config.markdown.clone())),
        OutputFormat::Json => Box::new(JsonExporter::new(config.json.clone())),
        OutputFormat::Chunked => Box::new(ChunkedExporter::new(config.chunked.clone())),
    }
}
