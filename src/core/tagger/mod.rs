//! Keyword tagging.
//!
//! The tagger builds one corpus per conversation (title, then the texts of
//! the selected roles, space-separated), hands it to a [`KeywordRanker`], and
//! replaces the chat's tags with the result.
//!
//! # Rankers
//!
//! | Ranker | Feature | Method |
//! |--------|---------|--------|
//! | [`RakeRanker`] | `rake` (default) | Rapid Automatic Keyword Extraction over phrases of up to three words |
//! | [`FrequencyRanker`] | always | Most frequent words outside a stop-word list |
//!
//! If the primary ranker fails, the frequency ranker is used instead.
//!
//! # Example
//!
//! ```
//! use chatmill::core::{Processor, TaggerService};
//! use chatmill::config::TaggerConfig;
//! use chatmill::{Chat, Message, Platform, Role};
//!
//! let tagger = TaggerService::new(TaggerConfig::default());
//! let chat = Chat::new(Platform::ChatGpt, "Borrow checker errors")
//!     .with_message(Message::new(Role::User, "Why does the borrow checker reject my closure?"));
//!
//! let tagged = tagger.process(&chat);
//! assert!(!tagged.tags.is_empty());
//! ```

mod frequency;
#[cfg(feature = "rake")]
mod rake;

pub use frequency::FrequencyRanker;
#[cfg(feature = "rake")]
pub use rake::RakeRanker;

use tracing::warn;

use super::processor::Processor;
use crate::config::TaggerConfig;
use crate::error::Result;
use crate::{Chat, Role};

/// A keyword extraction strategy.
pub trait KeywordRanker: Send + Sync {
    /// Returns the name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns at most `config.max_tags` keywords, best first.
    fn extract(&self, text: &str, config: &TaggerConfig) -> Result<Vec<String>>;
}

/// Tagging processor.
pub struct TaggerService {
    config: TaggerConfig,
    ranker: Box<dyn KeywordRanker>,
    fallback: FrequencyRanker,
}

impl TaggerService {
    /// Creates a tagger with the best ranker compiled in.
    pub fn new(config: TaggerConfig) -> Self {
        Self::with_ranker(config, default_ranker())
    }

    /// Creates a tagger with a specific primary ranker.
    pub fn with_ranker(config: TaggerConfig, ranker: Box<dyn KeywordRanker>) -> Self {
        Self {
            config,
            ranker,
            fallback: FrequencyRanker::new(),
        }
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// Name of the primary ranker.
    pub fn ranker_name(&self) -> &'static str {
        self.ranker.name()
    }

    /// Builds the text the rankers see.
    pub fn corpus(&self, chat: &Chat) -> String {
        let title = (self.config.use_title && !chat.title.is_empty()).then_some(chat.title.as_str());

        let texts = chat.messages.iter().filter_map(|m| {
            let selected = match m.role {
                Role::User => self.config.use_user_messages,
                Role::Assistant => self.config.use_assistant_messages,
                Role::System => false,
            };
            selected.then_some(m.text.as_str())
        });

        title.into_iter().chain(texts).collect::<Vec<_>>().join(" ")
    }

    /// Extracts tags from a corpus, falling back to word frequency on error.
    pub fn extract(&self, corpus: &str) -> Vec<String> {
        if corpus.trim().is_empty() || self.config.max_tags == 0 {
            return Vec::new();
        }

        match self.ranker.extract(corpus, &self.config) {
            Ok(tags) => tags,
            Err(err) => {
                warn!(ranker = self.ranker.name(), error = %err, "keyword ranker failed, using word frequency");
                self.fallback
                    .extract(corpus, &self.config)
                    .unwrap_or_default()
            }
        }
    }
}

impl Default for TaggerService {
    fn default() -> Self {
        Self::new(TaggerConfig::default())
    }
}

impl Processor for TaggerService {
    fn name(&self) -> &'static str {
        "tagger"
    }

    fn process(&self, chat: &Chat) -> Chat {
        let tags = self.extract(&self.corpus(chat));
        chat.clone().with_tags(tags)
    }
}

#[cfg(feature = "rake")]
fn default_ranker() -> Box<dyn KeywordRanker> {
    Box::new(RakeRanker::new())
}

#[cfg(not(feature = "rake"))]
fn default_ranker() -> Box<dyn KeywordRanker> {
    Box::new(FrequencyRanker::new())
}
