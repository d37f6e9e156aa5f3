//! # Chatmill
//!
//! A Rust library for turning AI assistant conversation exports into
//! Markdown notes, canonical JSON, or token-chunked JSON for retrieval
//! pipelines.
//!
//! ## Overview
//!
//! Chatmill reads the `conversations.json` exports of:
//! - **ChatGPT**: a branching message tree per conversation, flattened to its primary thread
//! - **Claude**: a flat message list per conversation
//!
//! Every export is normalized into one [`Chat`] model, passed through an
//! ordered chain of processors (cleanup, PII redaction, keyword tagging) and
//! handed to one exporter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatmill::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let pipeline = Pipeline::new(
//!         create_loader(Platform::ChatGpt),
//!         create_exporter(OutputFormat::Markdown, &ExportConfig::default()),
//!     )
//!     .with_processors(
//!         ProcessorChain::new()
//!             .with(Cleaner::new(CleanerConfig::default()))
//!             .with(PrivacyRedactor::new(PrivacyConfig::default())?)
//!             .with(TaggerService::new(TaggerConfig::default())),
//!     );
//!
//!     let stats = pipeline.run("conversations.json".as_ref(), "vault".as_ref())?;
//!     println!("{} messages exported", stats.total_messages);
//!     Ok(())
//! }
//! ```
//!
//! ## Working with the Stream
//!
//! Loaders produce chats lazily, so each one can be handled as it arrives:
//!
//! ```rust,no_run
//! use chatmill::loader::{Platform, create_loader};
//!
//! let loader = create_loader(Platform::Claude);
//! for chat in loader.load("conversations.json".as_ref())? {
//!     println!("{}: {} messages", chat.title, chat.message_count());
//! }
//! # Ok::<(), chatmill::ChatmillError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`chat`], [`message`] — The canonical [`Chat`] and [`Message`] model
//! - [`loader`] — [`Loader`](loader::Loader) trait, [`Platform`], [`create_loader`](loader::create_loader)
//! - [`loaders`] — [`ChatGptLoader`](loaders::ChatGptLoader), [`ClaudeLoader`](loaders::ClaudeLoader)
//! - [`parsing`] — Record-level decoding shared by the loaders
//! - [`core`] — Processors, exporters and the [`Pipeline`](core::Pipeline)
//! - [`format`] — [`OutputFormat`](format::OutputFormat) and [`create_exporter`](format::create_exporter)
//! - [`config`] — Processor and exporter configuration
//! - [`timestamp`] — Timestamp conversion and the canonical text form
//! - [`progress`] — Progress callbacks
//! - [`error`] — [`ChatmillError`] and [`Result`]
//! - [`cli`] — CLI argument types (feature `cli`)
//! - [`prelude`] — Convenient re-exports

pub mod chat;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod loader;
pub mod loaders;
pub mod message;
pub mod parsing;
pub mod progress;
pub mod timestamp;

// Re-export the main types at the crate root for convenience
pub use chat::Chat;
pub use error::{ChatmillError, Result};
pub use loader::Platform;
pub use message::{Message, Role};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatmill::prelude::*;
/// ```
pub mod prelude {
    // Model
    pub use crate::{Chat, Message, Platform, Role};

    // Error types
    pub use crate::error::{ChatmillError, Result};

    // Loading
    pub use crate::loader::{ChatStream, Loader, create_loader};

    // Configs
    pub use crate::config::{
        ChunkedConfig, CleanerConfig, ExportConfig, JsonConfig, MarkdownConfig, PrivacyConfig,
        TaggerConfig,
    };

    // Processing
    pub use crate::core::{
        Cleaner, PiiCategory, PrivacyRedactor, Processor, ProcessorChain, TaggerService,
    };

    // Export
    pub use crate::core::output::{Exporter, from_json, read_json};
    pub use crate::format::{OutputFormat, create_exporter};

    // Orchestration
    pub use crate::core::pipeline::{ConversionStats, InputSummary, Pipeline, inspect};
    pub use crate::progress::{Progress, ProgressCallback};
}
