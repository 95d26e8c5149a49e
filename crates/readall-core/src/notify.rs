//! Notice and trigger sinks.

use parking_lot::Mutex;
use tracing::{error, info};

use readall_protocols::{Notifier, TriggerControl};

/// Forwards notices to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        info!(target: "readall::notice", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "readall::notice", "{}", message);
    }
}

/// Severity of a recorded notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Keeps every notice in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().clone()
    }

    /// Messages only, regardless of level.
    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter(|(level, _)| *level == NoticeLevel::Error)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.notices.lock().push((NoticeLevel::Info, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices.lock().push((NoticeLevel::Error, message.to_string()));
    }
}

/// Trigger that remembers each busy/idle change.
#[derive(Debug, Default)]
pub struct RecordingTrigger {
    changes: Mutex<Vec<bool>>,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<bool> {
        self.changes.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.changes.lock().last().copied().unwrap_or(false)
    }
}

impl TriggerControl for RecordingTrigger {
    fn set_busy(&self, busy: bool) {
        self.changes.lock().push(busy);
    }
}
