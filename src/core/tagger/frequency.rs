//! Word-frequency keyword ranker.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::KeywordRanker;
use crate::config::TaggerConfig;
use crate::error::Result;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("word pattern is valid"));

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "has", "have", "been", "were", "being", "their", "there", "this", "that",
    "with", "would", "could", "should", "what", "from", "they", "will", "when", "where",
    "which", "while", "into", "some", "then", "than", "them", "these", "your", "just", "like",
    "make", "know", "think", "take", "want", "does", "about", "also", "more", "other", "only",
    "very", "here",
];

/// Ranks lowercase ASCII words of three or more letters by how often they
/// occur. Ties go to the word seen first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyRanker;

impl FrequencyRanker {
    pub fn new() -> Self {
        Self
    }
}

impl KeywordRanker for FrequencyRanker {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn extract(&self, text: &str, config: &TaggerConfig) -> Result<Vec<String>> {
        let lowered = text.to_lowercase();

        // word -> (count, first position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, word) in WORD
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| !STOP_WORDS.contains(w))
            .enumerate()
        {
            counts.entry(word).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));

        Ok(ranked
            .into_iter()
            .take(config.max_tags)
            .map(|(word, _)| word.to_string())
            .collect())
    }
}
