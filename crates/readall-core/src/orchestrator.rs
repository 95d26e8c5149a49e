//! Action orchestrator.
//!
//! Drives one provider through select → pause → mark read → pause →
//! deselect, surfaces the first failure and always hands the trigger back in
//! its idle state.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};

use readall_protocols::{AutomationError, Document, MailProvider, Notifier, TriggerControl};

use crate::timing::Timings;

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

/// Workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkflowState {
    Idle = 0,
    Selecting = 1,
    PausingAfterSelect = 2,
    MarkingRead = 3,
    PausingAfterMark = 4,
    Deselecting = 5,
    Done = 6,
    Failed = 7,
}

impl From<u8> for WorkflowState {
    fn from(v: u8) -> Self {
        match v {
            1 => WorkflowState::Selecting,
            2 => WorkflowState::PausingAfterSelect,
            3 => WorkflowState::MarkingRead,
            4 => WorkflowState::PausingAfterMark,
            5 => WorkflowState::Deselecting,
            6 => WorkflowState::Done,
            7 => WorkflowState::Failed,
            _ => WorkflowState::Idle,
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum WorkflowOutcome {
    Completed,
    Failed(AutomationError),
    /// Another run was in flight; the document was not touched.
    AlreadyRunning,
}

impl WorkflowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed)
    }
}

/// Outcome plus every state the run passed through.
#[derive(Debug)]
pub struct WorkflowReport {
    pub outcome: WorkflowOutcome,
    pub transitions: Vec<WorkflowState>,
}

/// Restores the trigger and the in-flight flag on every exit path.
///
/// Panics are covered only while unwinding; the release profile aborts on
/// panic, and then the process is gone along with the trigger.
struct BusyGuard<'a> {
    trigger: &'a dyn TriggerControl,
    running: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.trigger.set_busy(false);
        self.running.store(false, Ordering::Release);
    }
}

/// Sequences the three provider operations.
pub struct Orchestrator {
    timings: Timings,
    trigger: Arc<dyn TriggerControl>,
    notifier: Arc<dyn Notifier>,
    state: AtomicU8,
    running: AtomicBool,
}

impl Orchestrator {
    pub fn new(
        timings: Timings,
        trigger: Arc<dyn TriggerControl>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            timings,
            trigger,
            notifier,
            state: AtomicU8::new(WorkflowState::Idle as u8),
            running: AtomicBool::new(false),
        }
    }

    /// Current (or last reached) phase.
    pub fn state(&self) -> WorkflowState {
        WorkflowState::from(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run the workflow once against `doc`.
    pub async fn run(&self, provider: &dyn MailProvider, doc: &dyn Document) -> WorkflowReport {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Workflow already in flight; ignoring trigger");
            return WorkflowReport {
                outcome: WorkflowOutcome::AlreadyRunning,
                transitions: Vec::new(),
            };
        }

        self.trigger.set_busy(true);
        let _guard = BusyGuard {
            trigger: self.trigger.as_ref(),
            running: &self.running,
        };

        info!("Starting workflow for {}", provider.name());
        let mut transitions = Vec::new();
        let outcome = match self.drive(provider, doc, &mut transitions).await {
            Ok(()) => {
                self.enter(WorkflowState::Done, &mut transitions);
                self.notifier.info("Done!");
                WorkflowOutcome::Completed
            }
            Err(e) => {
                self.enter(WorkflowState::Failed, &mut transitions);
                error!("Workflow for {} failed: {}", provider.name(), e);
                self.notifier.error(&e.to_string());
                WorkflowOutcome::Failed(e)
            }
        };

        WorkflowReport {
            outcome,
            transitions,
        }
    }

    async fn drive(
        &self,
        provider: &dyn MailProvider,
        doc: &dyn Document,
        transitions: &mut Vec<WorkflowState>,
    ) -> Result<(), AutomationError> {
        self.enter(WorkflowState::Selecting, transitions);
        self.notifier.info("Selecting all...");
        provider.select_all(doc).await?;

        self.enter(WorkflowState::PausingAfterSelect, transitions);
        tokio::time::sleep(self.timings.after_select).await;

        self.enter(WorkflowState::MarkingRead, transitions);
        self.notifier.info("Marking as read...");
        provider.mark_as_read(doc).await?;

        self.enter(WorkflowState::PausingAfterMark, transitions);
        tokio::time::sleep(self.timings.after_mark_read).await;

        self.enter(WorkflowState::Deselecting, transitions);
        self.notifier.info("Deselecting all...");
        provider.deselect_all(doc).await
    }

    fn enter(&self, state: WorkflowState, transitions: &mut Vec<WorkflowState>) {
        self.state.store(state as u8, Ordering::Release);
        transitions.push(state);
    }
}
