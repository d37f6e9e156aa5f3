//! Processor trait and the ordered processor chain.
//!
//! A processor is a pure `&Chat -> Chat` transformation. It may drop or
//! rewrite messages and replace tags, but never reorders messages.
//!
//! # Example
//!
//! ```
//! use chatmill::core::{Cleaner, ProcessorChain};
//! use chatmill::config::CleanerConfig;
//! use chatmill::{Chat, Message, Platform, Role};
//!
//! let chain = ProcessorChain::new().with(Cleaner::new(CleanerConfig::default()));
//!
//! let chat = Chat::new(Platform::Claude, "Demo")
//!     .with_message(Message::new(Role::User, "<b>Hello</b>   world"));
//!
//! let cleaned = chain.apply(chat).unwrap();
//! assert_eq!(cleaned.messages[0].text, "Hello world");
//! ```

use tracing::debug;

use crate::Chat;

/// A pure conversation transformation.
pub trait Processor: Send + Sync {
    /// Returns the name used in logs.
    fn name(&self) -> &'static str;

    /// Returns a new chat derived from `chat`.
    fn process(&self, chat: &Chat) -> Chat;

    /// Processes every chat in order.
    fn process_batch(&self, chats: &[Chat]) -> Vec<Chat> {
        chats.iter().map(|chat| self.process(chat)).collect()
    }
}

/// Processors applied in the order they were added.
#[derive(Default)]
pub struct ProcessorChain {
    stages: Vec<Box<dyn Processor>>,
}

impl ProcessorChain {
    /// Creates an empty chain, which passes chats through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn with(mut self, processor: impl Processor + 'static) -> Self {
        self.stages.push(Box::new(processor));
        self
    }

    /// Appends a boxed stage.
    pub fn push(&mut self, processor: Box<dyn Processor>) {
        self.stages.push(processor);
    }

    /// Names of the stages, in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage on `chat`.
    ///
    /// Returns `None` if the result has no messages; such a chat must never
    /// reach an exporter.
    pub fn apply(&self, chat: Chat) -> Option<Chat> {
        let mut current = chat;
        for stage in &self.stages {
            current = stage.process(&current);
        }

        if current.is_empty() {
            debug!(conversation = %current.id, "dropping conversation emptied by processing");
            return None;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, Platform, Role};

    struct DropUser;

    impl Processor for DropUser {
        fn name(&self) -> &'static str {
            "drop-user"
        }

        fn process(&self, chat: &Chat) -> Chat {
            let kept = chat
                .messages
                .iter()
                .filter(|m| m.role != Role::User)
                .cloned()
                .collect();
            chat.clone().with_messages(kept)
        }
    }

    struct Shout;

    impl Processor for Shout {
        fn name(&self) -> &'static str {
            "shout"
        }

        fn process(&self, chat: &Chat) -> Chat {
            let loud = chat
                .messages
                .iter()
                .map(|m| m.with_text(m.text.to_uppercase()))
                .collect();
            chat.clone().with_messages(loud)
        }
    }

    fn chat() -> Chat {
        Chat::new(Platform::ChatGpt, "t")
            .with_message(Message::new(Role::User, "hi"))
            .with_message(Message::new(Role::Assistant, "hello"))
    }

    #[test]
    fn test_empty_chain_passes_through() {
        let input = chat();
        let output = ProcessorChain::new().apply(input.clone()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_stages_run_in_order() {
        let chain = ProcessorChain::new().with(DropUser).with(Shout);
        assert_eq!(chain.stage_names(), ["drop-user", "shout"]);

        let output = chain.apply(chat()).unwrap();
        assert_eq!(output.message_count(), 1);
        assert_eq!(output.messages[0].text, "HELLO");
    }

    #[test]
    fn test_emptied_chat_is_dropped() {
        let only_user = Chat::new(Platform::Claude, "t").with_message(Message::new(Role::User, "x"));
        let chain = ProcessorChain::new().with(DropUser);
        assert!(chain.apply(only_user).is_none());
    }

    #[test]
    fn test_process_batch_does_not_touch_input() {
        let inputs = vec![chat(), chat()];
        let outputs = Shout.process_batch(&inputs);
        assert_eq!(outputs.len(), 2);
        assert_eq!(inputs[0].messages[0].text, "hi");
        assert_eq!(outputs[0].messages[0].text, "HI");
    }
}
