//! Text cleanup: HTML tags, whitespace noise and stock AI disclaimers.
//!
//! Each message goes through these steps, in order:
//!
//! | Step | Enabled by | Effect |
//! |------|------------|--------|
//! | 1 | [`remove_system_messages`](CleanerConfig::remove_system_messages) | Drop system messages |
//! | 2 | [`remove_html`](CleanerConfig::remove_html) | Strip `<...>` tags |
//! | 3 | [`normalize_whitespace`](CleanerConfig::normalize_whitespace) | Tabs to one space, space runs to one, 3+ newlines to two |
//! | 4 | [`remove_boilerplate`](CleanerConfig::remove_boilerplate) | Drop whole disclaimer lines |
//! | 5 | always | Trim |
//!
//! A message whose text ends up empty is dropped. The title is never touched.
//!
//! # Example
//!
//! ```
//! use chatmill::core::{Cleaner, Processor};
//! use chatmill::config::CleanerConfig;
//!
//! let cleaner = Cleaner::new(CleanerConfig::default());
//! let text = cleaner.clean_text("As an AI, I cannot feel.\n<p>Rust\t\tis   fun</p>\n\n\n\nReally.");
//! assert_eq!(text, "Rust is fun\n\nReally.");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::processor::Processor;
use crate::config::CleanerConfig;
use crate::{Chat, Role};

/// Disclaimer lines, matched case-insensitively against the trimmed line.
const BOILERPLATE_PATTERNS: &[&str] = &[
    r"^I am a large language model.*$",
    r"^I'm an AI language model.*$",
    r"^As an AI,?\s*I.*$",
    r"^I don't have the ability to.*$",
    r"^I'm sorry,?\s*but as an AI.*$",
    r"^I'm unable to.*$",
    r"^As a language model,?\s*I.*$",
];

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("HTML tag pattern is valid"));

static TABS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t+").expect("tab pattern is valid"));

static SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("space pattern is valid"));

static NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline pattern is valid"));

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("boilerplate pattern is valid"))
        .collect()
});

/// Local, rule-based cleaner. See the module docs for the steps.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleanerConfig,
}

impl Cleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Applies steps 2 to 5 to a piece of text.
    pub fn clean_text(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.remove_html {
            result = strip_html(&result);
        }

        if self.config.normalize_whitespace {
            result = normalize_whitespace(&result);
        }

        if self.config.remove_boilerplate {
            result = result
                .split('\n')
                .filter(|line| !is_boilerplate(line))
                .collect::<Vec<_>>()
                .join("\n");
        }

        result.trim().to_string()
    }
}

impl Processor for Cleaner {
    fn name(&self) -> &'static str {
        "cleaner"
    }

    fn process(&self, chat: &Chat) -> Chat {
        let messages = chat
            .messages
            .iter()
            .filter(|m| !(self.config.remove_system_messages && m.role == Role::System))
            .filter_map(|m| {
                let cleaned = self.clean_text(&m.text);
                (!cleaned.is_empty()).then(|| m.with_text(cleaned))
            })
            .collect();

        chat.clone().with_messages(messages)
    }
}

/// Removes `<...>` tags in one pass. A stray `<` before a tag is part of it.
fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// Tabs are folded before space runs so the result is stable on a second pass.
fn normalize_whitespace(text: &str) -> String {
    let text = TABS.replace_all(text, " ");
    let text = SPACES.replace_all(&text, " ");
    NEWLINES.replace_all(&text, "\n\n").into_owned()
}

/// Returns `true` if the trimmed line is a stock disclaimer.
pub fn is_boilerplate(line: &str) -> bool {
    let trimmed = line.trim();
    BOILERPLATE.iter().any(|re| re.is_match(trimmed))
}
