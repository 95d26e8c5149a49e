//! Console sinks for the CLI.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info};

use readall_protocols::{Notifier, TriggerControl};

/// Alert text shown when a workflow fails.
pub(crate) fn failure_alert(message: &str) -> String {
    format!("Read All Failed: {}", message)
}

/// Prints progress to stdout and failures to stderr.
#[derive(Debug, Default)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        info!(target: "readall::notice", "{}", message);
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "readall::notice", "{}", message);
        eprintln!("{}", failure_alert(message));
    }
}

/// Stands in for the toolbar button: the CLI has nothing to grey out, so it
/// only remembers the state.
#[derive(Debug, Default)]
pub(crate) struct ConsoleTrigger {
    busy: AtomicBool,
}

impl ConsoleTrigger {
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl TriggerControl for ConsoleTrigger {
    fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
        debug!("Trigger {}", if busy { "busy" } else { "idle" });
    }
}
