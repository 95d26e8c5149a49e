//! Named pauses and bounds.
//!
//! The host page never signals that it finished reacting to an action, so
//! fixed pauses stand in for completion events. Every value is overridable
//! through [`Timings`].

use std::time::Duration;

/// Pause between select-all and mark-as-read.
pub const AFTER_SELECT_PAUSE: Duration = Duration::from_millis(500);
/// Pause between mark-as-read and deselect-all.
pub const AFTER_MARK_READ_PAUSE: Duration = Duration::from_millis(2000);
/// Readiness lookup bound.
pub const READY_TIMEOUT: Duration = Duration::from_millis(5000);
/// Default bound for waiting on a single control.
pub const WAIT_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Checkbox state confirmation: attempts and spacing.
pub const CONFIRM_ATTEMPTS: u32 = 10;
pub const CONFIRM_INTERVAL: Duration = Duration::from_millis(200);
/// Bulk-confirmation dialog lookup: attempts and spacing.
pub const DIALOG_POLL_ATTEMPTS: u32 = 5;
pub const DIALOG_POLL_INTERVAL: Duration = Duration::from_millis(200);
/// Bound on waiting for a confirmed dialog to go away.
pub const BULK_START_TIMEOUT: Duration = Duration::from_millis(5000);
/// Settle time after opening the selection-scope menu.
pub const SCOPE_MENU_SETTLE: Duration = Duration::from_millis(200);
/// Settle time after opening a menu whose items animate in.
pub const MENU_SETTLE: Duration = Duration::from_millis(300);
/// Pause after choosing a selection scope.
pub const AFTER_SCOPE_PAUSE: Duration = Duration::from_millis(500);
/// Pause before re-reading a toggled master checkbox.
pub const TOGGLE_RECHECK_PAUSE: Duration = Duration::from_millis(500);

/// Every pause and bound used by providers and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    pub after_select: Duration,
    pub after_mark_read: Duration,
    pub ready_timeout: Duration,
    pub wait_timeout: Duration,
    pub confirm_attempts: u32,
    pub confirm_interval: Duration,
    pub dialog_poll_attempts: u32,
    pub dialog_poll_interval: Duration,
    pub bulk_start_timeout: Duration,
    pub scope_menu_settle: Duration,
    pub menu_settle: Duration,
    pub after_scope: Duration,
    pub toggle_recheck: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            after_select: AFTER_SELECT_PAUSE,
            after_mark_read: AFTER_MARK_READ_PAUSE,
            ready_timeout: READY_TIMEOUT,
            wait_timeout: WAIT_TIMEOUT,
            confirm_attempts: CONFIRM_ATTEMPTS,
            confirm_interval: CONFIRM_INTERVAL,
            dialog_poll_attempts: DIALOG_POLL_ATTEMPTS,
            dialog_poll_interval: DIALOG_POLL_INTERVAL,
            bulk_start_timeout: BULK_START_TIMEOUT,
            scope_menu_settle: SCOPE_MENU_SETTLE,
            menu_settle: MENU_SETTLE,
            after_scope: AFTER_SCOPE_PAUSE,
            toggle_recheck: TOGGLE_RECHECK_PAUSE,
        }
    }
}
