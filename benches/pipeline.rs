//! Benchmarks for chatmill loading, processing and exporting.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench pipeline -- chatgpt`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatmill::config::{ChunkedConfig, CleanerConfig, PrivacyConfig, TaggerConfig};
use chatmill::core::output::{ChunkedExporter, Exporter, MarkdownExporter};
use chatmill::core::{Cleaner, PrivacyRedactor, Processor, TaggerService};
use chatmill::loader::Loader;
use chatmill::loaders::{ChatGptLoader, ClaudeLoader};
use chatmill::{Chat, Message, Platform, Role};

// =============================================================================
// Test Data Generators
// =============================================================================

/// ChatGPT export where every conversation is a straight thread of `turns` nodes.
fn generate_chatgpt_json(conversations: usize, turns: usize) -> String {
    let records: Vec<String> = (0..conversations)
        .map(|c| {
            let mut nodes =
                vec![r#""n0": {"parent": null, "children": ["n1"], "message": null}"#.to_string()];
            for t in 1..=turns {
                let role = if t % 2 == 0 { "assistant" } else { "user" };
                let children = if t < turns { format!(r#"["n{}"]"#, t + 1) } else { "[]".to_string() };
                nodes.push(format!(
                    r#""n{t}": {{"parent": "n{}", "children": {children}, "message": {{"id": "m{c}-{t}", "author": {{"role": "{role}"}}, "content": {{"content_type": "text", "parts": ["Message number {t} about rust lifetimes"]}}, "create_time": {}}}}}"#,
                    t - 1,
                    1705314600 + t * 60
                ));
            }
            format!(
                r#"{{"id": "c{c}", "title": "Conversation {c}", "create_time": 1705314600, "mapping": {{{}}}}}"#,
                nodes.join(",")
            )
        })
        .collect();
    format!("[{}]", records.join(",\n"))
}

fn generate_claude_json(conversations: usize, turns: usize) -> String {
    let records: Vec<String> = (0..conversations)
        .map(|c| {
            let messages: Vec<String> = (0..turns)
                .map(|t| {
                    let sender = if t % 2 == 0 { "human" } else { "assistant" };
                    format!(
                        r#"{{"uuid": "m{c}-{t}", "sender": "{sender}", "text": "Message number {t} about async runtimes", "created_at": "2024-01-15T10:30:00Z"}}"#
                    )
                })
                .collect();
            format!(
                r#"{{"uuid": "c{c}", "name": "Conversation {c}", "created_at": "2024-01-15T10:00:00Z", "chat_messages": [{}]}}"#,
                messages.join(",")
            )
        })
        .collect();
    format!("[{}]", records.join(",\n"))
}

fn generate_chat(messages: usize) -> Chat {
    let noisy = [
        "<p>How do I <b>pin</b> a future?</p>",
        "As an AI, I cannot run code.\nUse   Box::pin   or the pin! macro.",
        "Send the logs to ops@example.com or call 555-123-4567.",
        "Thanks!\t\tThat fixed the borrow checker error.",
    ];
    let list = (0..messages)
        .map(|i| {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            Message::new(role, noisy[i % noisy.len()])
        })
        .collect();
    Chat::new(Platform::ChatGpt, "Pinning futures").with_messages(list)
}

// =============================================================================
// Loading Benchmarks
// =============================================================================

fn bench_chatgpt_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("chatgpt_loading");
    let loader = ChatGptLoader::new();

    for size in [10_usize, 100, 1_000] {
        let json = generate_chatgpt_json(size, 20);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let chats: Vec<Chat> = loader.load_str(black_box(json), "bench.json").unwrap().collect();
                black_box(chats)
            });
        });
    }
    group.finish();
}

fn bench_claude_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("claude_loading");
    let loader = ClaudeLoader::new();

    for size in [10_usize, 100, 1_000] {
        let json = generate_claude_json(size, 20);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let chats: Vec<Chat> = loader.load_str(black_box(json), "bench.json").unwrap().collect();
                black_box(chats)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Processing Benchmarks
// =============================================================================

fn bench_processors(c: &mut Criterion) {
    let mut group = c.benchmark_group("processors");
    let cleaner = Cleaner::new(CleanerConfig::default());
    let redactor = PrivacyRedactor::new(PrivacyConfig::default()).unwrap();
    let tagger = TaggerService::new(TaggerConfig::default().with_use_assistant_messages(true));
    let stages: [(&str, &dyn Processor); 3] =
        [("cleaner", &cleaner), ("privacy", &redactor), ("tagger", &tagger)];

    for size in [10_usize, 100, 1_000] {
        let chat = generate_chat(size);
        group.throughput(Throughput::Elements(size as u64));
        for (name, stage) in stages {
            group.bench_with_input(BenchmarkId::new(name, size), &chat, |b, chat| {
                b.iter(|| black_box(stage.process(black_box(chat))));
            });
        }
    }
    group.finish();
}

// =============================================================================
// Export Benchmarks
// =============================================================================

fn bench_exporters(c: &mut Criterion) {
    let mut group = c.benchmark_group("exporters");
    let markdown = MarkdownExporter::default();
    let chunked = ChunkedExporter::new(ChunkedConfig::new().with_chunk_size(256));

    for size in [10_usize, 100, 1_000] {
        let chat = generate_chat(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("markdown", size), &chat, |b, chat| {
            b.iter(|| black_box(markdown.export_single(black_box(chat)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("chunked", size), &chat, |b, chat| {
            b.iter(|| black_box(chunked.export_single(black_box(chat)).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_chatgpt_loading,
    bench_claude_loading,
    bench_processors,
    bench_exporters
);
criterion_main!(benches);
