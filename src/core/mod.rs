//! Core processing for chatmill.
//!
//! This module contains:
//! - [`processor`] - The [`Processor`] trait and [`ProcessorChain`]
//! - [`cleaner`] - HTML, whitespace and boilerplate cleanup
//! - [`privacy`] - PII redaction
//! - [`tagger`] - Keyword tagging with pluggable rankers
//! - [`output`] - Exporters (Markdown, JSON, chunked JSON)
//! - [`pipeline`] - Load, process and export in one call
//!
//! # Quick Start
//!
//! ```rust
//! use chatmill::core::{
//!     Cleaner, PrivacyRedactor, TaggerService, ProcessorChain,
//!     Exporter, Pipeline, ConversionStats,
//! };
//! ```

pub mod cleaner;
pub mod output;
pub mod pipeline;
pub mod privacy;
pub mod processor;
pub mod tagger;

pub use cleaner::Cleaner;
pub use output::{ChunkedExporter, Exporter, JsonExporter, MarkdownExporter};
pub use pipeline::{ConversionStats, InputSummary, Pipeline, inspect};
pub use privacy::{PiiCategory, PrivacyRedactor};
pub use processor::{Processor, ProcessorChain};
pub use tagger::{FrequencyRanker, KeywordRanker, TaggerService};

#[cfg(feature = "rake")]
pub use tagger::RakeRanker;
