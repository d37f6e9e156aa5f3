//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Cli`] / [`Command`] - Argument structure (for use with clap)
//! - [`Source`] - Supported export sources
//! - [`Format`] - Output format options
//!
//! Both enums convert into their library counterparts, so the binary only
//! wires things together.
//!
//! ```rust
//! use chatmill::cli::{Format, Source};
//! use chatmill::format::OutputFormat;
//! use chatmill::loader::Platform;
//!
//! assert_eq!(Platform::from(Source::Claude), Platform::Claude);
//! assert_eq!(OutputFormat::from(Format::Chunked), OutputFormat::Chunked);
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{
    ChunkedConfig, CleanerConfig, ExportConfig, JsonConfig, MarkdownConfig, PrivacyConfig,
    TaggerConfig,
};
use crate::core::{Cleaner, PrivacyRedactor, ProcessorChain, TaggerService};
use crate::error::Result;

/// Normalize ChatGPT and Claude conversation exports into Markdown notes,
/// canonical JSON, or token-chunked JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatmill")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatmill convert conversations.json -s claude -f markdown -o ./vault
    chatmill convert conversations.json -s chatgpt -f chunked --redact-pii -o chunks.json
    chatmill info conversations.json -s chatgpt")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert an export into another format
    Convert(ConvertArgs),

    /// Show conversation count, message count and date range of an export
    Info(InfoArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the conversation export (JSON)
    pub input: PathBuf,

    /// Source platform
    #[arg(short, long, value_enum)]
    pub source: Source,

    /// Output path (directory for markdown, file for json and chunked)
    #[arg(short, long, default_value = "chatmill-output")]
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: Format,

    /// Redact emails, phone numbers and other PII
    #[arg(long)]
    pub redact_pii: bool,

    /// Do not extract keyword tags
    #[arg(long)]
    pub no_tags: bool,

    /// Do not strip HTML, boilerplate and extra whitespace
    #[arg(long)]
    pub no_clean: bool,

    /// Drop system messages
    #[arg(long)]
    pub remove_system: bool,

    /// Markdown: put notes in YYYY/MM folders
    #[arg(long)]
    pub by_date: bool,

    /// Markdown: add times to message headings
    #[arg(short = 't', long)]
    pub timestamps: bool,

    /// JSON: write without indentation
    #[arg(long)]
    pub compact: bool,

    /// JSON: write one file per conversation into the output directory
    #[arg(long)]
    pub split: bool,

    /// Chunked: token budget per chunk
    #[arg(long, default_value_t = 4096, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: u64,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Path to the conversation export (JSON)
    pub input: PathBuf,

    /// Source platform
    #[arg(short, long, value_enum)]
    pub source: Source,
}

impl ConvertArgs {
    /// Cleaner settings, or `None` when no cleaning step is enabled.
    pub fn cleaner_config(&self) -> Option<CleanerConfig> {
        let config = CleanerConfig::new().with_remove_system_messages(self.remove_system);
        if !self.no_clean {
            return Some(config);
        }
        self.remove_system.then(|| {
            config
                .with_remove_html(false)
                .with_normalize_whitespace(false)
                .with_remove_boilerplate(false)
        })
    }

    /// Builds the processor chain: cleaner, then redactor, then tagger.
    ///
    /// Tags are extracted from the cleaned, redacted text.
    pub fn processors(&self) -> Result<ProcessorChain> {
        let mut chain = ProcessorChain::new();
        if let Some(config) = self.cleaner_config() {
            chain.push(Box::new(Cleaner::new(config)));
        }
        if self.redact_pii {
            chain.push(Box::new(PrivacyRedactor::new(PrivacyConfig::default())?));
        }
        if !self.no_tags {
            chain.push(Box::new(TaggerService::new(TaggerConfig::default())));
        }
        Ok(chain)
    }

    /// Exporter settings from the format flags.
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::new()
            .with_markdown(
                MarkdownConfig::new()
                    .with_organize_by_date(self.by_date)
                    .with_timestamps(self.timestamps),
            )
            .with_json(
                JsonConfig::new()
                    .with_pretty(!self.compact)
                    .with_single_file(!self.split),
            )
            .with_chunked(ChunkedConfig::new().with_chunk_size(self.chunk_size as usize))
    }
}

/// Supported export sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// ChatGPT conversations.json
    #[value(name = "chatgpt", alias = "openai", alias = "gpt")]
    #[serde(alias = "openai", alias = "gpt")]
    ChatGpt,

    /// Claude conversations.json
    #[value(alias = "anthropic")]
    #[serde(alias = "anthropic")]
    Claude,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::ChatGpt => write!(f, "ChatGPT"),
            Source::Claude => write!(f, "Claude"),
        }
    }
}

impl From<Source> for crate::loader::Platform {
    fn from(source: Source) -> Self {
        match source {
            Source::ChatGpt => crate::loader::Platform::ChatGpt,
            Source::Claude => crate::loader::Platform::Claude,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One Markdown note per conversation (default)
    #[default]
    #[value(alias = "md")]
    Markdown,

    /// Canonical JSON
    Json,

    /// Token-chunked JSON for retrieval pipelines
    #[value(alias = "chunks")]
    Chunked,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

impl From<Format> for crate::format::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => crate::format::OutputFormat::Markdown,
            Format::Json => crate::format::OutputFormat::Json,
            Format::Chunked => crate::format::OutputFormat::Chunked,
        }
    }
}
