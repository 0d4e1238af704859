//! Status reporting for long-running marker jobs.
//!
//! The pipeline never prints or logs directly; it reports through a
//! [`ProgressSink`], so a CLI, a GUI log pane or a test can each decide what
//! to do with the messages.

use parking_lot::Mutex;

/// Receives human-readable status messages.
pub trait ProgressSink: Send + Sync {
    fn status(&self, message: &str);
}

/// Forwards status messages to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn status(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Discards status messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn status(&self, _message: &str) {}
}

/// Keeps every status message in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn status(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
