//! # chatmill CLI
//!
//! Command-line interface for the chatmill library.

use std::process;
use std::sync::Arc;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatmill::ChatmillError;
use chatmill::cli::{Cli, Command, ConvertArgs, InfoArgs};
use chatmill::core::pipeline::{Pipeline, inspect};
use chatmill::format::{OutputFormat, create_exporter};
use chatmill::loader::{Platform, create_loader};
use chatmill::progress::{Progress, ProgressCallback};

fn main() {
    let cli = <Cli as ClapParser>::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so the summaries on stdout stay clean.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), ChatmillError> {
    match cli.command {
        Command::Convert(args) => convert(&args),
        Command::Info(args) => info(&args),
    }
}

fn print_header() {
    println!("🔓 chatmill v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

fn convert(args: &ConvertArgs) -> Result<(), ChatmillError> {
    let platform: Platform = args.source.into();
    let format: OutputFormat = args.format.into();

    // Construction errors surface before any file is touched
    let processors = args.processors()?;
    let loader = create_loader(platform);
    let exporter = create_exporter(format, &args.export_config());

    print_header();
    println!("📖 Source:  {}", args.source);
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", args.output.display());
    println!("📄 Format:  {}", format);
    if !processors.is_empty() {
        println!("🧹 Stages:  {}", processors.stage_names().join(" → "));
    }
    println!();

    let pipeline = Pipeline::new(loader, exporter).with_processors(processors);
    let stats = pipeline.run_with_progress(&args.input, &args.output, &progress_printer())?;
    eprintln!();

    println!("✅ Done! Output saved to {}", args.output.display());
    if stats.outputs.len() == 1 {
        println!("   {}", stats.outputs[0].display());
    } else {
        println!("   {} files written", stats.outputs.len());
    }

    println!();
    println!("📊 Summary:");
    println!("   Conversations: {}", stats.total_conversations);
    println!("   Exported:      {}", stats.exported_conversations());
    println!("   Messages:      {}", stats.total_messages);
    println!("   Skipped empty: {}", stats.skipped_empty);
    println!("   Time:          {:.2}s", stats.elapsed.as_secs_f64());

    Ok(())
}

fn info(args: &InfoArgs) -> Result<(), ChatmillError> {
    let loader = create_loader(args.source.into());

    print_header();
    let summary = inspect(loader.as_ref(), &args.input)?;

    println!("📁 File:          {}", args.input.display());
    println!("📦 Size:          {:.2} MB", summary.file_size as f64 / 1024.0 / 1024.0);
    println!("🏷️  Source:        {}", args.source);
    println!("💬 Conversations: {}", summary.conversations);
    println!("✉️  Messages:      {}", summary.messages);
    if let (Some(earliest), Some(latest)) = (summary.earliest, summary.latest) {
        println!(
            "📅 Date range:    {} → {}",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d")
        );
    }

    Ok(())
}

fn progress_printer() -> ProgressCallback {
    Arc::new(|progress: Progress| {
        if let (Some(pct), Some(total)) = (progress.percentage(), progress.total_conversations) {
            eprint!(
                "\r⏳ {:>5.1}% ({}/{} conversations)",
                pct, progress.conversations_processed, total
            );
        }
    })
}
