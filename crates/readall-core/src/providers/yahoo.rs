//! Yahoo Mail provider.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use readall_protocols::{AutomationError, CheckState, Document, DomError, MailProvider, NodeId};

use super::host_matches;
use super::strategy::{mark_read, MarkReadControls};
use crate::click::simulate_click;
use crate::controls::{Lookup, MENU_ITEM_SELECTOR};
use crate::timing::Timings;
use crate::wait::wait_for;

const HOSTS: &[&str] = &["mail.yahoo.com"];
const READY_MARKER: &str = "div[data-test-id=\"virtual-list\"]";
const SELECT_ALL: &str = "button[data-test-id=\"checkbox-select-all\"]";

const MARK_READ: MarkReadControls = MarkReadControls {
    awaited: None,
    direct: &[
        Lookup::Selector("button[title=\"Mark as read\"]"),
        Lookup::Selector("button[data-test-id=\"toolbar-mark-read\"]"),
    ],
    overflow: &["button[data-test-id=\"toolbar-more\"]"],
    overflow_item: MENU_ITEM_SELECTOR,
    overflow_labels: &["Mark as read"],
    hint: None,
    dialog: None,
};

/// Yahoo's select-all button often carries no state at all; it just cycles.
async fn selection_state(doc: &dyn Document, button: NodeId) -> Result<Option<CheckState>, DomError> {
    if let Some(value) = doc.attribute(button, "aria-checked").await? {
        return Ok(Some(CheckState::from_aria(Some(&value))));
    }
    if let Some(value) = doc.attribute(button, "data-test-selected").await? {
        return Ok(Some(if value == "true" {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }));
    }
    Ok(None)
}

/// Yahoo Mail web client.
#[derive(Debug, Clone, Default)]
pub struct YahooProvider {
    timings: Timings,
}

impl YahooProvider {
    pub fn new(timings: Timings) -> Self {
        Self { timings }
    }

    /// Hostname fragments this provider answers to.
    pub fn hosts(&self) -> &'static [&'static str] {
        HOSTS
    }
}

#[async_trait]
impl MailProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo"
    }

    fn is_applicable(&self, location: &Url) -> bool {
        host_matches(location, HOSTS)
    }

    async fn is_ready(&self, doc: &dyn Document) -> Result<bool, AutomationError> {
        Ok(wait_for(doc, READY_MARKER, self.timings.ready_timeout)
            .await?
            .is_some())
    }

    async fn select_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        let button = wait_for(doc, SELECT_ALL, self.timings.wait_timeout)
            .await?
            .ok_or_else(|| AutomationError::control_not_found("the select-all button"))?;
        if selection_state(doc, button)
            .await?
            .is_some_and(CheckState::has_selection)
        {
            info!("Selection already present; skipping select-all");
            return Ok(());
        }
        simulate_click(doc, button).await?;
        Ok(())
    }

    async fn mark_as_read(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        mark_read(doc, &MARK_READ, &self.timings).await
    }

    async fn deselect_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        let Some(button) = doc.query_selector(SELECT_ALL).await? else {
            warn!("Could not find select-all button to clear the selection");
            return Ok(());
        };
        match selection_state(doc, button).await? {
            Some(state) if !state.has_selection() => {
                debug!("Nothing selected");
            }
            // Selected, or no state exposed: the button toggles, so press it.
            _ => simulate_click(doc, button).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "yahoo_tests.rs"]
mod tests;
