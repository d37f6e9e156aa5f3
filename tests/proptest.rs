//! Property-based tests for chatmill.
//!
//! These tests generate random inputs to find edge cases.

use proptest::prelude::*;

use chatmill::core::output::{ChunkedExporter, from_json};
use chatmill::prelude::*;
use chrono::{DateTime, Utc};

/// Text fragments the cleaner has to deal with (no regex strategies, they are slow)
fn arb_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Hello".to_string(),
        "  spaced   out  ".to_string(),
        "\t\ttabs\t".to_string(),
        "\n\n\n\n".to_string(),
        "<p>para</p>".to_string(),
        "<<b>b>nested".to_string(),
        "<>".to_string(),
        "a < b > c".to_string(),
        "Привет мир".to_string(),
        "🎉🔥 emoji".to_string(),
        "line\nbreak".to_string(),
        String::new(),
        " ".to_string(),
    ])
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..8).prop_map(|parts| parts.concat())
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![Role::User, Role::Assistant, Role::System])
}

fn arb_message() -> impl Strategy<Value = Message> {
    (arb_role(), arb_text(), prop::option::of(0i64..2_000_000_000)).prop_map(
        |(role, text, secs)| {
            let message = Message::new(role, text);
            match secs.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0)) {
                Some(ts) => message.with_timestamp(ts),
                None => message,
            }
        },
    )
}

fn arb_chat() -> impl Strategy<Value = Chat> {
    (
        prop::sample::select(vec!["Title", "", "日本語", "a/b: \"quoted\""]),
        prop::collection::vec(arb_message(), 0..10),
        prop::collection::vec(prop::sample::select(vec!["rust", "serde", "tokio"]), 0..3),
    )
        .prop_map(|(title, messages, tags)| {
            Chat::new(Platform::Claude, title)
                .with_messages(messages)
                .with_tags(tags)
        })
}

fn no_boilerplate_cleaner() -> Cleaner {
    Cleaner::new(CleanerConfig::new().with_remove_boilerplate(false))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // CLEANER PROPERTIES
    // ============================================

    /// A second pass changes nothing
    #[test]
    fn clean_text_is_idempotent(text in arb_text()) {
        let cleaner = no_boilerplate_cleaner();
        let once = cleaner.clean_text(&text);
        prop_assert_eq!(cleaner.clean_text(&once), once);
    }

    /// Cleaned text has no tabs, space runs or blank-line runs
    #[test]
    fn clean_text_normalizes_whitespace(text in arb_text()) {
        let cleaned = no_boilerplate_cleaner().clean_text(&text);
        prop_assert!(!cleaned.contains('\t'));
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.contains("\n\n\n"));
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }

    /// Processing never adds messages and never leaves empty ones
    #[test]
    fn cleaner_never_grows_chat(chat in arb_chat()) {
        let cleaned = Cleaner::new(CleanerConfig::default()).process(&chat);
        prop_assert!(cleaned.message_count() <= chat.message_count());
        prop_assert!(cleaned.messages.iter().all(|m| !m.text.is_empty()));
        prop_assert_eq!(&cleaned.title, &chat.title);
    }

    /// The chain either drops a chat or returns one with messages
    #[test]
    fn chain_output_is_never_empty(chat in arb_chat()) {
        let chain = ProcessorChain::new()
            .with(Cleaner::new(CleanerConfig::default()))
            .with(TaggerService::new(TaggerConfig::default()));
        if let Some(processed) = chain.apply(chat) {
            prop_assert!(!processed.is_empty());
            prop_assert!(processed.tags.len() <= 5);
        }
    }

    // ============================================
    // PRIVACY PROPERTIES
    // ============================================

    /// Nothing detectable is left after redaction
    #[test]
    fn redacted_emails_are_gone(
        parts in prop::collection::vec(
            prop::sample::select(vec!["mail ", "a@b.com", " and ", "first.last@example.org", "x", "@"]),
            0..10,
        )
    ) {
        let redactor = PrivacyRedactor::new(PrivacyConfig::new().with_categories(["email"])).unwrap();
        let redacted = redactor.redact_text(&parts.concat());
        prop_assert!(redactor.detect(&redacted).is_empty());
    }

    // ============================================
    // CANONICAL JSON PROPERTIES
    // ============================================

    /// Canonical JSON decodes back to the same chats
    #[test]
    fn canonical_json_round_trip(chats in prop::collection::vec(arb_chat(), 0..5)) {
        let exporter = create_exporter(OutputFormat::Json, &ExportConfig::default());
        let rendered: Vec<String> = chats
            .iter()
            .map(|chat| exporter.export_single(chat).unwrap())
            .collect();
        let restored = from_json(&format!("[{}]", rendered.join(","))).unwrap();
        prop_assert_eq!(restored, chats);
    }

    // ============================================
    // CHUNKING PROPERTIES
    // ============================================

    /// Every message lands in exactly one chunk, in order
    #[test]
    fn chunks_cover_every_message_once(chat in arb_chat(), chunk_size in 0usize..64) {
        let exporter = ChunkedExporter::new(ChunkedConfig::new().with_chunk_size(chunk_size));
        let mut next_id = 0;
        let chunks = exporter.chunk_chat(&chat, &mut next_id);

        let ids: Vec<&String> = chunks.iter().flat_map(|c| &c.message_ids).collect();
        let expected: Vec<&String> = chat.messages.iter().map(|m| &m.id).collect();
        prop_assert_eq!(ids, expected);
        prop_assert!(chunks.iter().all(|c| !c.message_ids.is_empty()));
        prop_assert_eq!(next_id, chunks.len());
    }

    /// A chunk only exceeds the budget when it holds a single message
    #[test]
    fn chunks_respect_budget(chat in arb_chat(), chunk_size in 1usize..64) {
        let exporter = ChunkedExporter::new(ChunkedConfig::new().with_chunk_size(chunk_size));
        let mut next_id = 0;

        for chunk in exporter.chunk_chat(&chat, &mut next_id) {
            let separators = 2 * (chunk.message_ids.len() - 1);
            let rendered_chars = chunk.text.chars().count() - separators;
            prop_assert!(
                chunk.message_ids.len() == 1 || rendered_chars <= exporter.max_chars(),
                "chunk {} has {} chars over {} messages",
                chunk.chunk_id,
                rendered_chars,
                chunk.message_ids.len()
            );
        }
    }
}
