//! Progress reporting for pipeline runs.
//!
//! This module provides a callback-based progress mechanism for library users
//! who want push-based updates while a [`Pipeline`](crate::core::pipeline::Pipeline)
//! works through an export.
//!
//! # Example
//!
//! ```rust
//! use chatmill::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     if let Some(pct) = progress.percentage() {
//!         println!("Progress: {:.1}%", pct);
//!     }
//! });
//!
//! for i in 0..10usize {
//!     callback(Progress::new(i + 1, Some(10)));
//! }
//! ```

use std::sync::Arc;

/// Progress of a run, counted in conversations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Conversations pulled from the loader so far.
    pub conversations_processed: usize,

    /// Raw records in the input, if counted up front.
    pub total_conversations: Option<usize>,

    /// Messages kept after processing so far.
    pub messages_processed: usize,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(conversations_processed: usize, total_conversations: Option<usize>) -> Self {
        Self {
            conversations_processed,
            total_conversations,
            messages_processed: 0,
        }
    }

    /// Sets the number of messages kept so far.
    #[must_use]
    pub fn with_messages(mut self, messages: usize) -> Self {
        self.messages_processed = messages;
        self
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// Returns `None` if the total is not known.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatmill::progress::Progress;
    ///
    /// assert_eq!(Progress::new(5, Some(20)).percentage(), Some(25.0));
    /// assert_eq!(Progress::new(5, None).percentage(), None);
    /// ```
    pub fn percentage(&self) -> Option<f64> {
        self.total_conversations.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.conversations_processed as f64 / total as f64) * 100.0
            }
        })
    }

    /// Returns whether every counted record has been processed.
    ///
    /// Records skipped by the loader are never reported, so a run can end
    /// without this becoming `true`.
    pub fn is_complete(&self) -> bool {
        self.total_conversations
            .is_some_and(|total| self.conversations_processed >= total)
    }

    /// Returns the number of records not yet processed, if the total is known.
    pub fn remaining(&self) -> Option<usize> {
        self.total_conversations
            .map(|total| total.saturating_sub(self.conversations_processed))
    }
}

/// Callback type for receiving progress updates.
///
/// # Example
///
/// ```rust
/// use chatmill::progress::{Progress, ProgressCallback};
/// use std::sync::Arc;
///
/// let callback: ProgressCallback = Arc::new(|progress| {
///     println!("Processed {} conversations", progress.conversations_processed);
/// });
///
/// callback(Progress::new(10, Some(20)));
/// ```
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints to stderr.
///
/// ```rust
/// use chatmill::progress::{Progress, stderr_progress};
///
/// let callback = stderr_progress();
/// // Prints "Progress: 50.0% (1 of 2 conversations)" to stderr
/// callback(Progress::new(1, Some(2)));
/// ```
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        if let (Some(pct), Some(total)) = (progress.percentage(), progress.total_conversations) {
            eprintln!(
                "Progress: {:.1}% ({} of {} conversations)",
                pct, progress.conversations_processed, total
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert_eq!(Progress::new(50, Some(200)).percentage(), Some(25.0));
        assert_eq!(Progress::new(3, None).percentage(), None);
        assert_eq!(Progress::new(0, Some(0)).percentage(), Some(100.0));
    }

    #[test]
    fn test_progress_is_complete() {
        assert!(Progress::new(10, Some(10)).is_complete());
        assert!(!Progress::new(5, Some(10)).is_complete());
        assert!(!Progress::new(5, None).is_complete());
    }

    #[test]
    fn test_progress_remaining() {
        assert_eq!(Progress::new(3, Some(10)).remaining(), Some(7));
        assert_eq!(Progress::new(12, Some(10)).remaining(), Some(0));
        assert_eq!(Progress::new(3, None).remaining(), None);
    }

    #[test]
    fn test_progress_with_messages() {
        let progress = Progress::new(1, Some(2)).with_messages(40);
        assert_eq!(progress.messages_processed, 40);
    }

    #[test]
    fn test_progress_callback_type() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let callback: ProgressCallback = Arc::new(move |progress| {
            counter_clone.store(progress.conversations_processed, Ordering::SeqCst);
        });

        callback(Progress::new(42, None));
        assert_eq!(counter.load(Ordering::SeqCst), 42);
        no_progress()(Progress::default());
    }
}
