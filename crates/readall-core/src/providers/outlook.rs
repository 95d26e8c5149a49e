//! Outlook on the web provider.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use readall_protocols::{AutomationError, CheckState, Document, MailProvider, NodeId};

use super::host_matches;
use super::strategy::{mark_read, tick_master, MarkReadControls};
use crate::click::simulate_click;
use crate::controls::{check_state, first_lookup, BulkDialog, Lookup, MENU_ITEM_SELECTOR};
use crate::timing::Timings;
use crate::wait::wait_for;

const HOSTS: &[&str] = &[
    "outlook.live.com",
    "outlook.office365.com",
    "outlook.office.com",
];
const READY_MARKERS: &[&str] = &["[role=\"listbox\"]", "[role=\"grid\"]"];

const SELECT_ALL: &str = "div[role=\"checkbox\"][title*=\"Select all\"]";
const SELECT_ALL_ICON: Lookup = Lookup::AncestorOf {
    selector: "i[data-icon-name=\"CircleRing\"]",
    ancestor: "div[role=\"checkbox\"]",
};

const MARK_READ: MarkReadControls = MarkReadControls {
    awaited: Some("button[name=\"Mark as read\"]"),
    direct: &[Lookup::AncestorOf {
        selector: "button i[data-icon-name=\"Read\"]",
        ancestor: "button",
    }],
    overflow: &["button[aria-label=\"More options\"]"],
    overflow_item: MENU_ITEM_SELECTOR,
    overflow_labels: &["Mark as read"],
    hint: None,
    dialog: Some(BulkDialog {
        dialog: &["[role=\"alertdialog\"]", "[role=\"dialog\"]"],
        confirm: &[],
        confirm_labels: &["OK", "Yes"],
    }),
};

/// Outlook.com / Microsoft 365 web client.
#[derive(Debug, Clone, Default)]
pub struct OutlookProvider {
    timings: Timings,
}

impl OutlookProvider {
    pub fn new(timings: Timings) -> Self {
        Self { timings }
    }

    /// Hostname fragments this provider answers to.
    pub fn hosts(&self) -> &'static [&'static str] {
        HOSTS
    }

    async fn find_select_all(&self, doc: &dyn Document) -> Result<Option<NodeId>, AutomationError> {
        if let Some(node) = doc.query_selector(SELECT_ALL).await? {
            return Ok(Some(node));
        }
        Ok(first_lookup(doc, &[SELECT_ALL_ICON]).await?)
    }
}

#[async_trait]
impl MailProvider for OutlookProvider {
    fn name(&self) -> &str {
        "Outlook"
    }

    fn is_applicable(&self, location: &Url) -> bool {
        host_matches(location, HOSTS)
    }

    async fn is_ready(&self, doc: &dyn Document) -> Result<bool, AutomationError> {
        for marker in READY_MARKERS {
            if wait_for(doc, marker, self.timings.ready_timeout).await?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn select_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        let checkbox = match wait_for(doc, SELECT_ALL, self.timings.wait_timeout).await? {
            Some(node) => Some(node),
            None => first_lookup(doc, &[SELECT_ALL_ICON]).await?,
        };
        let checkbox =
            checkbox.ok_or_else(|| AutomationError::control_not_found("the \"Select all\" checkbox"))?;
        tick_master(doc, checkbox, &self.timings).await?;
        Ok(())
    }

    async fn mark_as_read(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        mark_read(doc, &MARK_READ, &self.timings).await
    }

    async fn deselect_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        let Some(checkbox) = self.find_select_all(doc).await? else {
            warn!("Could not find \"Select all\" checkbox to clear the selection");
            return Ok(());
        };
        if !check_state(doc, checkbox).await?.has_selection() {
            debug!("Nothing selected");
            return Ok(());
        }
        simulate_click(doc, checkbox).await?;
        tokio::time::sleep(self.timings.toggle_recheck).await;

        if let Some(checkbox) = self.find_select_all(doc).await? {
            if check_state(doc, checkbox).await? == CheckState::Checked {
                simulate_click(doc, checkbox).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "outlook_tests.rs"]
mod tests;
