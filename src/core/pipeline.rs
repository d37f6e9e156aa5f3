//! End-to-end conversion: load, process, export.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatmill::core::pipeline::Pipeline;
//! use chatmill::core::{Cleaner, ProcessorChain};
//! use chatmill::format::{ExportConfig, OutputFormat, create_exporter};
//! use chatmill::loader::{Platform, create_loader};
//!
//! # fn main() -> chatmill::Result<()> {
//! let pipeline = Pipeline::new(
//!     create_loader(Platform::Claude),
//!     create_exporter(OutputFormat::Markdown, &ExportConfig::default()),
//! )
//! .with_processors(ProcessorChain::new().with(Cleaner::default()));
//!
//! let stats = pipeline.run("conversations.json".as_ref(), "notes".as_ref())?;
//! println!("{} conversations, {} messages", stats.exported_conversations(), stats.total_messages);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::info;

use super::output::Exporter;
use super::processor::ProcessorChain;
use crate::error::Result;
use crate::format::OutputFormat;
use crate::loader::{Loader, Platform};
use crate::progress::{Progress, ProgressCallback};

/// Counters for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionStats {
    /// Conversations the loader produced
    pub total_conversations: usize,

    /// Messages written by the exporter
    pub total_messages: usize,

    /// Conversations dropped because processing left them empty
    pub skipped_empty: usize,

    /// Wall time of the whole run
    pub elapsed: Duration,

    pub source_platform: Platform,
    pub output_format: OutputFormat,

    /// Paths the exporter wrote
    pub outputs: Vec<PathBuf>,
}

impl ConversionStats {
    /// Conversations handed to the exporter.
    pub fn exported_conversations(&self) -> usize {
        self.total_conversations - self.skipped_empty
    }
}

/// Overview of an export file, without processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSummary {
    pub conversations: usize,
    pub messages: usize,
    /// Earliest conversation creation time, if any conversation has one
    pub earliest: Option<DateTime<Utc>>,
    /// Latest conversation creation time
    pub latest: Option<DateTime<Utc>>,
    /// File size in bytes
    pub file_size: u64,
}

/// A loader, a processor chain and an exporter wired together.
pub struct Pipeline {
    loader: Box<dyn Loader>,
    processors: ProcessorChain,
    exporter: Box<dyn Exporter>,
}

impl Pipeline {
    /// Creates a pipeline with no processors.
    pub fn new(loader: Box<dyn Loader>, exporter: Box<dyn Exporter>) -> Self {
        Self {
            loader,
            processors: ProcessorChain::new(),
            exporter,
        }
    }

    /// Replaces the processor chain.
    #[must_use]
    pub fn with_processors(mut self, processors: ProcessorChain) -> Self {
        self.processors = processors;
        self
    }

    pub fn loader(&self) -> &dyn Loader {
        self.loader.as_ref()
    }

    pub fn processors(&self) -> &ProcessorChain {
        &self.processors
    }

    pub fn exporter(&self) -> &dyn Exporter {
        self.exporter.as_ref()
    }

    /// Converts `input` and writes the result to `destination`.
    ///
    /// # Errors
    ///
    /// Returns the loader's file-level errors, or the exporter's write errors.
    /// Malformed records inside the file are logged and skipped instead.
    pub fn run(&self, input: &Path, destination: &Path) -> Result<ConversionStats> {
        self.execute(input, destination, None)
    }

    /// Like [`run`](Self::run), reporting progress after every conversation.
    ///
    /// Raw records are counted up front so the callback sees a total.
    pub fn run_with_progress(
        &self,
        input: &Path,
        destination: &Path,
        callback: &ProgressCallback,
    ) -> Result<ConversionStats> {
        self.execute(input, destination, Some(callback))
    }

    fn execute(
        &self,
        input: &Path,
        destination: &Path,
        callback: Option<&ProgressCallback>,
    ) -> Result<ConversionStats> {
        let started = Instant::now();
        info!(
            input = %input.display(),
            loader = self.loader.name(),
            stages = ?self.processors.stage_names(),
            exporter = self.exporter.name(),
            "starting conversion"
        );

        let total = match callback {
            Some(_) => Some(self.loader.count(input)?),
            None => None,
        };

        let mut seen = 0;
        let mut skipped_empty = 0;
        let mut total_messages = 0;
        let mut kept = Vec::new();

        for chat in self.loader.load(input)? {
            seen += 1;
            match self.processors.apply(chat) {
                Some(processed) => {
                    total_messages += processed.message_count();
                    kept.push(processed);
                }
                None => skipped_empty += 1,
            }
            if let Some(callback) = callback {
                callback(Progress::new(seen, total).with_messages(total_messages));
            }
        }

        let outputs = self.exporter.export(&kept, destination)?;
        let stats = ConversionStats {
            total_conversations: seen,
            total_messages,
            skipped_empty,
            elapsed: started.elapsed(),
            source_platform: self.loader.platform(),
            output_format: self.exporter.format(),
            outputs,
        };

        info!(
            conversations = stats.total_conversations,
            messages = stats.total_messages,
            skipped_empty = stats.skipped_empty,
            files = stats.outputs.len(),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "conversion finished"
        );
        Ok(stats)
    }
}

/// Loads an export and summarizes it without processing or writing anything.
pub fn inspect(loader: &dyn Loader, path: &Path) -> Result<InputSummary> {
    let file_size = fs::metadata(path)?.len();

    let mut summary = InputSummary {
        conversations: 0,
        messages: 0,
        earliest: None,
        latest: None,
        file_size,
    };

    for chat in loader.load(path)? {
        summary.conversations += 1;
        summary.messages += chat.message_count();
        if let Some(created) = chat.created_at {
            summary.earliest = Some(summary.earliest.map_or(created, |e| e.min(created)));
            summary.latest = Some(summary.latest.map_or(created, |l| l.max(created)));
        }
    }

    Ok(summary)
}
