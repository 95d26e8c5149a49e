//! DOM readiness waiting and bounded polling.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use readall_protocols::{Document, DomError, NodeId};

/// Wait for an element matching `selector` to exist.
///
/// Returns at once when a match is already present. Otherwise resolves on
/// the first structural change after which a match exists, or with `None`
/// once `timeout` elapses. The change subscription is released on every
/// path, and exactly one result is produced.
pub async fn wait_for(
    doc: &dyn Document,
    selector: &str,
    timeout: Duration,
) -> Result<Option<NodeId>, DomError> {
    // Subscribe before the first lookup so a change landing in between is not lost.
    let mut changes = doc.observe();
    if let Some(node) = doc.query_selector(selector).await? {
        return Ok(Some(node));
    }

    let appeared = async {
        loop {
            if changes.changed().await.is_err() {
                // Publisher gone; only the timeout can end this wait now.
                std::future::pending::<()>().await;
            }
            if let Some(node) = doc.query_selector(selector).await? {
                return Ok::<_, DomError>(Some(node));
            }
        }
    };

    match tokio::time::timeout(timeout, appeared).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Timed out after {:?} waiting for {}", timeout, selector);
            Ok(None)
        }
    }
}

/// Re-run `lookup` up to `attempts` times, sleeping `interval` before each
/// run. Returns whether the lookup ever succeeded.
pub async fn poll_until<F, Fut>(
    attempts: u32,
    interval: Duration,
    mut lookup: F,
) -> Result<bool, DomError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, DomError>>,
{
    for _ in 0..attempts {
        tokio::time::sleep(interval).await;
        if lookup().await? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
