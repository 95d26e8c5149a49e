//! Outward-facing sinks consumed by a workflow.

/// The control that starts a workflow; shows a busy state while one runs.
pub trait TriggerControl: Send + Sync {
    fn set_busy(&self, busy: bool);
}

/// Receives textual progress and error notices.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);
}
