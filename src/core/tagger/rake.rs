//! Rapid Automatic Keyword Extraction.
//!
//! Candidate phrases are runs of words between stop words and punctuation.
//! Each word scores `degree / frequency` over the distinct candidates, and a
//! phrase scores the sum of its words. Phrases longer than three words are not
//! candidates.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::KeywordRanker;
use crate::config::TaggerConfig;
use crate::error::{ChatmillError, Result};

const MAX_PHRASE_WORDS: usize = 3;

/// Word and punctuation tokens.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]+").expect("token pattern is valid"));

/// English stop words.
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn", "didn",
    "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn", "shan",
    "shouldn", "wasn", "weren", "won", "wouldn",
];

/// RAKE keyword ranker. Ties keep the order in which phrases first appear.
#[derive(Debug, Clone)]
pub struct RakeRanker {
    stop_words: HashSet<&'static str>,
}

impl RakeRanker {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    fn is_boundary(&self, token: &str) -> bool {
        self.stop_words.contains(token) || !token.chars().any(char::is_alphanumeric)
    }

    /// Distinct candidate phrases in order of first appearance.
    fn candidates(&self, text: &str) -> Vec<Vec<String>> {
        let lowered = text.to_lowercase();
        let mut phrases = Vec::new();
        let mut seen = HashSet::new();
        let mut current: Vec<String> = Vec::new();

        let mut flush = |current: &mut Vec<String>| {
            if current.is_empty() {
                return;
            }
            let phrase = std::mem::take(current);
            if phrase.len() <= MAX_PHRASE_WORDS && seen.insert(phrase.join(" ")) {
                phrases.push(phrase);
            }
        };

        for token in TOKEN.find_iter(&lowered).map(|m| m.as_str()) {
            if self.is_boundary(token) {
                flush(&mut current);
            } else {
                current.push(token.to_string());
            }
        }
        flush(&mut current);

        phrases
    }

    /// Ranks phrases by score, best first.
    pub fn ranked_phrases(&self, text: &str) -> Vec<(String, f64)> {
        let candidates = self.candidates(text);

        let mut frequency: HashMap<&str, f64> = HashMap::new();
        let mut degree: HashMap<&str, f64> = HashMap::new();
        for phrase in &candidates {
            for word in phrase {
                *frequency.entry(word).or_default() += 1.0;
                *degree.entry(word).or_default() += phrase.len() as f64;
            }
        }

        let mut ranked: Vec<(String, f64)> = candidates
            .iter()
            .map(|phrase| {
                let score: f64 = phrase
                    .iter()
                    .map(|w| degree[w.as_str()] / frequency[w.as_str()])
                    .sum();
                (phrase.join(" "), score)
            })
            .collect();

        // Stable, so equal scores keep first-appearance order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

impl Default for RakeRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordRanker for RakeRanker {
    fn name(&self) -> &'static str {
        "rake"
    }

    fn extract(&self, text: &str, config: &TaggerConfig) -> Result<Vec<String>> {
        let ranked = self.ranked_phrases(text);
        if ranked.is_empty() {
            return Err(ChatmillError::keyword("rake", "no candidate phrases in text"));
        }

        Ok(ranked
            .into_iter()
            .map(|(phrase, _)| phrase.trim().to_string())
            .filter(|phrase| phrase.chars().count() >= config.min_keyword_length)
            .filter(|phrase| phrase.split_whitespace().count() <= MAX_PHRASE_WORDS)
            .take(config.max_tags)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_split_on_stop_words_and_punctuation() {
        let ranker = RakeRanker::new();
        let phrases: Vec<String> = ranker
            .candidates("The borrow checker, and the lifetime elision rules!")
            .into_iter()
            .map(|p| p.join(" "))
            .collect();
        assert_eq!(phrases, ["borrow checker", "lifetime elision rules"]);
    }

    #[test]
    fn test_long_phrases_are_not_candidates() {
        let ranker = RakeRanker::new();
        let phrases = ranker.candidates("fast async runtime scheduler design. tokio");
        assert_eq!(phrases, vec![vec!["tokio".to_string()]]);
    }

    #[test]
    fn test_repeated_phrases_counted_once() {
        let ranker = RakeRanker::new();
        let phrases = ranker.candidates("serde json. serde json. serde");
        assert_eq!(phrases.len(), 2);
    }

    #[test]
    fn test_scores() {
        let ranker = RakeRanker::new();
        let ranked = ranker.ranked_phrases("memory safety and memory leaks in rust");
        // memory: degree 4 / freq 2 = 2, safety: 2, leaks: 2, rust: 1
        assert_eq!(ranked[0], ("memory safety".to_string(), 4.0));
        assert_eq!(ranked[1], ("memory leaks".to_string(), 4.0));
        assert_eq!(ranked[2], ("rust".to_string(), 1.0));
    }

    #[test]
    fn test_extract_filters_short_phrases() {
        let ranker = RakeRanker::new();
        let config = TaggerConfig::new().with_min_keyword_length(4);
        let tags = ranker.extract("go is fun. cargo", &config).unwrap();
        assert_eq!(tags, ["cargo"]);
    }

    #[test]
    fn test_extract_respects_max_tags() {
        let ranker = RakeRanker::new();
        let config = TaggerConfig::new().with_max_tags(1);
        let tags = ranker.extract("pattern matching, trait objects, generic bounds", &config).unwrap();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_extract_errors_without_candidates() {
        let ranker = RakeRanker::new();
        let err = ranker.extract("the and of ...", &TaggerConfig::default()).unwrap_err();
        assert!(matches!(err, ChatmillError::Keyword { ranker: "rake", .. }));
    }
}
