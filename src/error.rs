//! Unified error types for chatmill.
//!
//! This module provides a single [`ChatmillError`] enum that covers every error
//! that can escape the library. Faults inside a single conversation record never
//! show up here: loaders log them and skip the record.
//!
//! # Error Kinds
//!
//! | Kind | Variants | When |
//! |------|----------|------|
//! | Fatal input | [`Io`](ChatmillError::Io), [`Parse`](ChatmillError::Parse), [`InvalidFormat`](ChatmillError::InvalidFormat) | The input file cannot be read or decoded as a whole |
//! | Configuration | [`InvalidConfig`](ChatmillError::InvalidConfig) | A processor or exporter was built with bad settings |
//! | Unsupported tag | [`UnsupportedPlatform`](ChatmillError::UnsupportedPlatform), [`UnsupportedFormat`](ChatmillError::UnsupportedFormat) | Registry lookup by an unknown name |
//! | Output | [`Io`](ChatmillError::Io), [`Json`](ChatmillError::Json) | Writing an export failed |

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatmill operations.
///
/// # Example
///
/// ```rust
/// use chatmill::error::Result;
/// use chatmill::Chat;
///
/// fn my_function() -> Result<Vec<Chat>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatmillError>;

/// The error type for all chatmill operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatmillError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to decode the input file as a whole.
    #[error("Failed to parse {format} export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "ChatGPT JSON")
        format: &'static str,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The file decoded, but its top-level structure is not what the loader expects.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A processor or exporter configuration was rejected at construction time.
    #[error("Invalid {component} configuration: {message}")]
    InvalidConfig {
        /// The component being configured (e.g., "privacy")
        component: &'static str,
        /// Description of the problem
        message: String,
    },

    /// An unknown source platform tag was requested.
    #[error("Unknown platform: '{0}'. Expected one of: chatgpt, openai, gpt, claude, anthropic")]
    UnsupportedPlatform(String),

    /// An unknown output format tag was requested.
    #[error("Unknown format: '{0}'. Expected one of: markdown, md, json, chunked, chunks")]
    UnsupportedFormat(String),

    /// JSON serialization error while writing output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A keyword ranker failed to produce tags.
    ///
    /// The tagger recovers from this by switching to its fallback ranker, so it
    /// only surfaces when a ranker is driven directly.
    #[error("Keyword ranker '{ranker}' failed: {message}")]
    Keyword {
        /// Name of the ranker that failed
        ranker: &'static str,
        /// Description of the failure
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatmillError {
    /// Creates a parse error for content that is not valid JSON.
    ///
    /// The path is attached later with [`with_path`](Self::with_path) by
    /// callers that read from disk.
    pub fn parse(format: &'static str, source: serde_json::Error) -> Self {
        ChatmillError::Parse {
            format,
            source,
            path: None,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatmillError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn invalid_config(component: &'static str, message: impl Into<String>) -> Self {
        ChatmillError::InvalidConfig {
            component,
            message: message.into(),
        }
    }

    /// Creates a keyword ranker error.
    pub fn keyword(ranker: &'static str, message: impl Into<String>) -> Self {
        ChatmillError::Keyword {
            ranker,
            message: message.into(),
        }
    }

    /// Attaches a file path to a parse error that has none. Other errors pass through.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            ChatmillError::Parse {
                format,
                source,
                path: None,
            } => ChatmillError::Parse {
                format,
                source,
                path: Some(file.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatmillError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatmillError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatmillError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ChatmillError::InvalidConfig { .. })
    }

    /// Returns `true` if an unknown platform or format tag was requested.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            ChatmillError::UnsupportedPlatform(_) | ChatmillError::UnsupportedFormat(_)
        )
    }

    /// Returns `true` if this error means the input file could not be used at all.
    pub fn is_fatal_input(&self) -> bool {
        self.is_io() || self.is_parse() || self.is_invalid_format()
    }
}

// ============================================================================
// Tests
// ============================================================================
